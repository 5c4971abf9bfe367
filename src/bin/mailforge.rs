use mailforge::{
    embed_local_images, export_html, load_project, send_preview_html, transpile, MailforgeConfig,
    MailforgeError,
};
use std::env;
use std::fs;
use std::process;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("mailforge=warn"))
        .unwrap();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn print_usage() {
    eprintln!("Usage: mailforge <command> <project.mf> [args...]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  transpile <project.mf>                              print email-safe markup");
    eprintln!("  export <project.mf> <out.html> [config.yaml]        write a complete HTML document");
    eprintln!("  send-preview <project.mf> [background] [config.yaml]  print the send body");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  mailforge transpile newsletter.mf");
    eprintln!("  mailforge export newsletter.mf newsletter.html mailforge.yaml");
    eprintln!("  mailforge send-preview newsletter.mf \"#f0f0f0\"");
}

fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "transpile" => run_transpile(&args[2]),
        "export" => match args.get(3) {
            Some(out) => run_export(&args[2], out, args.get(4).map(String::as_str)),
            None => {
                print_usage();
                process::exit(1);
            }
        },
        "send-preview" => run_send_preview(
            &args[2],
            args.get(3).map(String::as_str),
            args.get(4).map(String::as_str),
        ),
        other => {
            eprintln!("Unknown command '{}'", other);
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("✗ {} failed:", args[2]);
        print_error(&e);
        process::exit(1);
    }
}

fn load_config(path: Option<&str>) -> Result<MailforgeConfig, MailforgeError> {
    match path {
        Some(path) => MailforgeConfig::load(path),
        None => Ok(MailforgeConfig::default()),
    }
}

fn run_transpile(project: &str) -> Result<(), MailforgeError> {
    let raw = load_project(project)?;
    println!("{}", transpile(&raw)?);
    Ok(())
}

fn run_export(project: &str, out: &str, config: Option<&str>) -> Result<(), MailforgeError> {
    let config = load_config(config)?;
    let raw = load_project(project)?;
    let document = export_html(&raw, &config.export)?;
    fs::write(out, document).map_err(|e| MailforgeError::Io {
        path: out.to_string(),
        message: e.to_string(),
    })?;
    println!("✓ exported {} to {}", project, out);
    Ok(())
}

fn run_send_preview(
    project: &str,
    background: Option<&str>,
    config: Option<&str>,
) -> Result<(), MailforgeError> {
    let config = load_config(config)?;
    let raw = load_project(project)?;
    let body = send_preview_html(&raw, background, &config.send)?;
    let inline = embed_local_images(&body);
    println!("{}", inline.html);
    for image in &inline.images {
        eprintln!(
            "  inline {} <- {} ({}, {} bytes)",
            image.content_id,
            image.path.display(),
            image.mime_type,
            image.data.len()
        );
    }
    Ok(())
}

fn print_error(error: &MailforgeError) {
    match error {
        MailforgeError::ParseError { message, count } => {
            eprintln!("  Editor markup is not well formed ({} problem(s)):", count);
            eprintln!("    {}", message);
        }
        MailforgeError::EmptyDocument => {
            eprintln!("  Empty document: the project has no content");
        }
        MailforgeError::ConfigError(msg) => {
            eprintln!("  Config error:");
            eprintln!("    {}", msg);
        }
        MailforgeError::Io { path, message } => {
            eprintln!("  Could not access '{}':", path);
            eprintln!("    {}", message);
        }
    }
}
