use anyhow::Context;
use clap::Parser;
use copyguard::domain::model::{TraceMeta, TraceRecord};
use copyguard::utils::logger;
use copyguard::{KeyInput, PointerInput};

#[derive(Parser)]
#[command(name = "tracegen")]
#[command(about = "Generates deterministic page-event traces for replay testing")]
struct Args {
    /// Path of the JSONL trace file to write
    #[arg(short, long, default_value = "./trace.jsonl")]
    output: String,

    /// Page URL recorded in the trace meta line (omitted when not set)
    #[arg(long)]
    page_url: Option<String>,

    /// Keys to exercise, both as ctrl+key and as plain presses
    #[arg(short, long, value_delimiter = ',', default_value = "c,u,s,p,a,x")]
    keys: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Generating trace matrix for {} keys", args.keys.len());

    let records = build_matrix(&args);

    // 每行一筆 JSON 記錄
    let mut lines = Vec::with_capacity(records.len());
    for record in &records {
        let line = serde_json::to_string(record)
            .with_context(|| format!("failed to encode trace record for {}", args.output))?;
        lines.push(line);
    }

    let mut body = lines.join("\n");
    body.push('\n');

    if let Some(parent) = std::path::Path::new(&args.output).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }

    std::fs::write(&args.output, body)
        .with_context(|| format!("failed to write trace file {}", args.output))?;

    tracing::info!("✅ Wrote {} trace records", records.len());
    println!("✅ Wrote {} trace records to {}", records.len(), args.output);

    Ok(())
}

/// 固定的事件矩陣：右鍵選單、每個鍵的 ctrl 組合與單獨按下、最後一次左鍵點擊。
fn build_matrix(args: &Args) -> Vec<TraceRecord> {
    let mut records = Vec::new();
    let mut at_ms = 100u64;

    if let Some(url) = &args.page_url {
        records.push(TraceRecord::Meta(TraceMeta {
            page_url: Some(url.clone()),
            captured_at: Some(chrono::Utc::now()),
            agent: Some("copyguard-tracegen".to_string()),
        }));
    }

    records.push(TraceRecord::ContextMenu {
        at_ms,
        pointer: PointerInput::secondary_at(120, 40),
    });
    at_ms += 100;

    for key in &args.keys {
        records.push(TraceRecord::KeyDown {
            at_ms,
            input: KeyInput::with_ctrl(key),
        });
        at_ms += 100;
        records.push(TraceRecord::KeyUp {
            at_ms,
            input: KeyInput::plain(key),
        });
        at_ms += 100;
    }

    for key in &args.keys {
        records.push(TraceRecord::KeyDown {
            at_ms,
            input: KeyInput::plain(key),
        });
        at_ms += 100;
    }

    records.push(TraceRecord::Click {
        at_ms,
        pointer: PointerInput::default(),
    });

    records
}
