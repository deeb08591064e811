use std::collections::HashSet;
use std::path::{Path, PathBuf};

use manuscript_to_doc::{
    emit_document, enumerate_manuscripts, load_config, slugify, unique_slug, ExtractConfig,
    ParsePipeline, SourceError,
};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: manuscript2doc <path>... [--config FILE] [--out DIR] [--validate] [--cache]";

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1).filter(|v| !v.starts_with("--")).cloned()
}

/// A path argument is used as is; anything else is a glob.
fn expand_input(arg: &str) -> Result<Vec<PathBuf>, SourceError> {
    let path = Path::new(arg);
    if path.exists() {
        return Ok(vec![path.to_path_buf()]);
    }
    enumerate_manuscripts(arg)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("manuscript_to_doc=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let validate = args.iter().any(|a| a == "--validate");
    // identical inputs repeated in one invocation parse once
    let cache = args.iter().any(|a| a == "--cache");
    let config_path = flag_value(&args, "--config");
    let out_dir = flag_value(&args, "--out").unwrap_or_else(|| "./output".to_string());

    let mut positional = Vec::new();
    let mut skip_next = false;
    for arg in &args {
        if skip_next {
            skip_next = false;
        } else if arg == "--config" || arg == "--out" {
            skip_next = true;
        } else if !arg.starts_with("--") {
            positional.push(arg.clone());
        }
    }
    if positional.is_empty() {
        eprintln!("{}", serde_json::json!({ "tool": "args", "error": USAGE }));
        std::process::exit(1);
    }

    // 1) Config
    let cfg = match &config_path {
        Some(path) => match load_config(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "tool": "load_config",
                        "file": path,
                        "error": e.to_string()
                    })
                );
                std::process::exit(3);
            }
        },
        None => ExtractConfig::default(),
    };
    eprintln!(
        "{}",
        serde_json::json!({
            "tool": "load_config",
            "file": config_path,
            "status": "ok",
            "metadata_window": cfg.metadata_window
        })
    );

    // 2) Inputs
    let mut inputs = Vec::new();
    for arg in &positional {
        match expand_input(arg) {
            Ok(paths) => {
                eprintln!(
                    "{}",
                    serde_json::json!({ "tool": "enumerate_manuscripts", "pattern": arg, "count": paths.len() })
                );
                inputs.extend(paths);
            }
            Err(SourceError::NoFilesFound { guidance }) => {
                eprintln!(
                    "{}",
                    serde_json::json!({ "tool": "enumerate_manuscripts", "pattern": arg, "error": "NoFilesFound" })
                );
                eprintln!("{}", guidance);
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!(
                    "{}",
                    serde_json::json!({ "tool": "enumerate_manuscripts", "pattern": arg, "error": e.to_string() })
                );
                std::process::exit(1);
            }
        }
    }

    // 3) Parse and emit
    let mut pipeline = ParsePipeline::new(cfg).with_cache(cache).with_validation(validate);
    let mut used_slugs: HashSet<String> = HashSet::new();
    let mut failed = false;

    for input in &inputs {
        let outcome = match pipeline.run_path(input) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("{}", serde_json::json!({ "tool": "parse", "file": input, "error": e.to_string() }));
                failed = true;
                continue;
            }
        };
        eprintln!(
            "{}",
            serde_json::json!({
                "tool": "parse",
                "file": input,
                "title": outcome.document.title,
                "chapters": outcome.stats.chapters,
                "words": outcome.stats.words,
                "roles": outcome.stats.roles,
                "cache_hit": outcome.cache_hit
            })
        );
        if validate {
            eprintln!(
                "{}",
                serde_json::json!({ "tool": "validate", "file": input, "issues": outcome.issues })
            );
        }

        if out_dir == "-" {
            match serde_json::to_string_pretty(&outcome.document) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("{}", serde_json::json!({ "tool": "emit", "file": input, "error": e.to_string() }));
                    std::process::exit(6);
                }
            }
            continue;
        }

        let base = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| outcome.document.title.clone());
        let slug = unique_slug(slugify(&base), &mut used_slugs);
        match emit_document(&outcome.document, Path::new(&out_dir), &slug) {
            Ok(path) => eprintln!(
                "{}",
                serde_json::json!({ "tool": "emit", "file": input, "out": path, "status": "ok" })
            ),
            Err(e) => {
                eprintln!("{}", serde_json::json!({ "tool": "emit", "file": input, "error": e.to_string() }));
                std::process::exit(6);
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}
