use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use ddelta_tool::cli::{Cli, Commands};
use ddelta_tool::config::Config;
use ddelta_tool::delta::{Dispatcher, Plan, PlanMetadata, select};
use ddelta_tool::eval::{AcceptancePolicy, Evaluator, render_report};
use ddelta_tool::index::IndexLoader;

fn setup_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "error" => Level::ERROR,
        "warn" => Level::WARN,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("日志初始化失败");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Select {
            baseline,
            target,
            output,
        } => cmd_select(&config, &baseline, &target, output.as_deref()),
        Commands::Build {
            plan,
            repo,
            tool,
            workers,
            results,
            verify,
        } => {
            if !repo.exists() {
                return Err(anyhow!("仓库目录不存在: {:?}", repo));
            }
            cmd_build(&config, &plan, repo, tool, workers, results, verify)
        }
        Commands::Eval { results, threshold } => cmd_eval(&config, &results, threshold),
    }
}

fn cmd_select(config: &Config, baseline: &Path, target: &Path, output: Option<&Path>) -> Result<()> {
    let loader = IndexLoader::init(config.select.match_by);
    let baseline_index = loader.load(baseline)?;
    let target_index = loader.load(target)?;

    let jobs = select(
        &baseline_index,
        &target_index,
        &config.select.delta_extension,
    )?;

    match output {
        Some(output) => {
            let plan = Plan::new(PlanMetadata::new(baseline, target), jobs);
            plan.save(output)
                .with_context(|| format!("无法写入任务清单: {:?}", output))?;
            info!("任务清单已生成: {}", output.display());
            info!("  {}", plan.summary());
        }
        None => {
            let mut out = BufWriter::new(io::stdout().lock());
            for job in &jobs {
                writeln!(
                    out,
                    "{} {} {}",
                    job.baseline_path.display(),
                    job.target_path.display(),
                    job.output_path.display()
                )?;
            }
            out.flush()?;
        }
    }

    Ok(())
}

fn cmd_build(
    config: &Config,
    plan_path: &Path,
    repo: PathBuf,
    tool: Option<PathBuf>,
    workers: Option<usize>,
    results: Option<PathBuf>,
    verify: bool,
) -> Result<()> {
    let plan = Plan::load(plan_path)?;
    info!("{}", plan.summary());

    let tool = tool.unwrap_or_else(|| config.build.tool.clone());
    let mut dispatcher = Dispatcher::new(tool, repo)
        .with_checksum_verification(verify || config.build.verify_checksums);
    if let Some(workers) = workers.or(config.build.workers) {
        dispatcher = dispatcher.with_workers(workers);
    }

    let outcome = dispatcher.dispatch_all(&plan.jobs)?;

    if let Some(results) = results {
        let file = File::create(&results)
            .with_context(|| format!("无法创建结果日志: {:?}", results))?;
        let mut writer = BufWriter::new(file);
        outcome.write_result_log(&mut writer)?;
        writer.flush()?;
        info!("结果日志已写入: {}", results.display());
    }

    info!("{}", outcome.summary());

    Ok(())
}

fn cmd_eval(config: &Config, results: &Path, threshold: Option<u64>) -> Result<()> {
    let mut policy = AcceptancePolicy::from(&config.evaluate);
    if let Some(threshold) = threshold {
        policy.threshold_percent = threshold;
    }

    let file = File::open(results).with_context(|| format!("无法打开结果日志: {:?}", results))?;
    let report = Evaluator::new(policy).evaluate_log(BufReader::new(file))?;

    let mut out = BufWriter::new(io::stdout().lock());
    render_report(&report, &mut out)?;
    out.flush()?;

    Ok(())
}
