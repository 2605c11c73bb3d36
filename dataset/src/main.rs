use anyhow::Context;
use bridge::model::BridgeModel;
use bridge::server::EncodingBridge;
use clap::Parser;
use generator::profile::{write_annotation_tree, GeneratorConfig};
use vglntcore::annotation::max_total_score;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::artifacts::{read_scaler, write_artifacts};
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod bridge;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Builds driving-behavior datasets from per-frame annotations")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Directory holding one sub-directory of frame JSON files per video
    #[arg(long, default_value = "data/annotations")]
    annotations: PathBuf,
    #[arg(long, default_value = "data/dataset")]
    output: PathBuf,
    /// JSON object mapping video id to label; placeholder labels otherwise
    #[arg(long)]
    labels: Option<PathBuf>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Pad or truncate every video to this many frames
    #[arg(long)]
    max_frames: Option<usize>,
    /// Write a synthetic annotation tree with this many videos first
    #[arg(long)]
    synthesize: Option<usize>,
    /// Build the dataset and write its artifacts
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Print per-category rubric averages
    #[arg(long, default_value_t = false)]
    scores: bool,
    /// Keep the encoding bridge alive for inference-time requests
    #[arg(long, default_value_t = false)]
    serve: bool,
    /// Saved scaler.json the bridge scales requests with
    #[arg(long)]
    scaler: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        let config = WorkflowConfig::from_args(
            args.annotations,
            args.output,
            args.labels,
            args.seed,
            args.max_frames,
        );
        config.validate()?;
        config
    };

    if let Some(videos) = args.synthesize {
        let generator = GeneratorConfig {
            videos,
            seed: args.seed,
            ..Default::default()
        };
        let frames = write_annotation_tree(&workflow_config.annotations_dir, &generator)
            .context("writing synthetic annotations")?;
        println!(
            "Synthesized {} videos ({} frames) under {}",
            videos,
            frames,
            workflow_config.annotations_dir.display()
        );
    }

    let runner = Runner::new(workflow_config.clone());
    let mut model = BridgeModel::default();

    if args.offline {
        let result = runner.execute()?;
        let paths = write_artifacts(&workflow_config.output_dir, &result)?;
        let summary = &result.summary;

        println!(
            "Offline run -> tensor {:?}, videos succeeded {}, skipped {}, failed {}, malformed frames {}",
            summary.tensor_shape,
            summary.batch.succeeded,
            summary.batch.skipped,
            summary.batch.failed,
            summary.malformed_frames
        );
        for (video_id, reason) in &summary.issues {
            println!("  - {}: {}", video_id, reason);
        }
        if summary.placeholder_labels {
            println!("Labels are placeholders; pass --labels for real targets.");
        }
        println!(
            "Wrote {}, {} and {}",
            paths.dataset.display(),
            paths.scaler.display(),
            paths.summary.display()
        );

        model = BridgeModel {
            summary: Some(result.summary.clone()),
            scaler: Some(result.scaler.clone()),
        };
    }

    if args.scores {
        match runner.score()? {
            Some(scores) => {
                println!(
                    "Rubric averages over {} frames (mean total {:.2}/{}):",
                    scores.frames,
                    scores.average_total,
                    max_total_score()
                );
                for category in &scores.categories {
                    println!("- {}: {:.1}%", category.category, category.normalized);
                }
            }
            None => println!("No scorable frames found."),
        }
    }

    if let Some(path) = &args.scaler {
        model.scaler = Some(read_scaler(path)?);
    }

    if args.serve {
        let bridge = EncodingBridge::new(BridgeModel::default());
        bridge.publish(model);
        bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
