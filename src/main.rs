use std::{
    fs::File,
    io::{self, BufWriter, Write},
    time::Duration,
};

use anyhow::{Context, anyhow};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{OwoColorize, Stream};
use tracing_subscriber::EnvFilter;

use arxiv_crawler::{
    Article, error,
    config::CrawlConfig,
    crawler::{Crawler, Progress, article_from_page, normalize_identifier},
    fetch::HttpFetcher,
    subject,
};

use crate::cli::{Cli, Command, Format, OutputArgs, Source};

mod cli;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let config = CrawlConfig {
        base_url: args.base_url.clone(),
        global_timeout: Duration::from_secs(args.timeout),
        ..CrawlConfig::default()
    };

    match args.command {
        Command::List {
            subject,
            limit,
            output,
        } => list(config, &subject, limit, &output),
        Command::Fetch { from, output } => fetch(config, &from, &output),
        Command::Subjects => {
            let mut out = io::stdout().lock();
            for (code, name) in subject::iter() {
                writeln!(out, "{code}\t{name}")?;
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn open_output(args: &OutputArgs) -> anyhow::Result<Box<dyn Write>> {
    Ok(match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    })
}

fn render(article: &Article, format: Format) -> error::Result<String> {
    Ok(match format {
        Format::Json => format!("{}\n", article.to_json()?),
        Format::Biblatex => format!("{}\n\n", article.to_biblatex()?.to_biblatex_string()),
    })
}

fn report_failure(label: &str, error: &dyn std::fmt::Display) {
    eprintln!("{} {label}: {error:#}", "✗".if_supports_color(Stream::Stderr, |t| t.red()));
}

fn list(config: CrawlConfig, subject: &str, limit: Option<usize>, args: &OutputArgs) -> anyhow::Result<()> {
    let crawler = Crawler::new(HttpFetcher::new(&config), config);
    let mut out = open_output(args)?;

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("{spinner} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message(subject.to_string());

    // Records that validated but could not be rendered; counted as failures.
    let mut unrendered = 0;
    let report = crawler.crawl(subject, limit, |p| {
        match p {
            Progress::Listed(n) => pb.set_length(n as u64),
            Progress::Record(article) => {
                match render(article, args.format) {
                    Ok(text) => pb.suspend(|| out.write_all(text.as_bytes()))?,
                    Err(e) => {
                        pb.suspend(|| report_failure(article.identifier(), &e));
                        unrendered += 1;
                    }
                }
                pb.inc(1);
            }
            Progress::Skipped { identifier, error } => {
                pb.suspend(|| report_failure(identifier, error));
                pb.inc(1);
            }
        }
        Ok(())
    });
    pb.finish_and_clear();
    let report = report.with_context(|| format!("failed to crawl {subject}"))?;
    out.flush()?;

    print_summary(report.succeeded - unrendered, report.failed() + unrendered);
    Ok(())
}

fn fetch(config: CrawlConfig, sources: &[Source], args: &OutputArgs) -> anyhow::Result<()> {
    let crawler = Crawler::new(HttpFetcher::new(&config), config);
    let mut out = open_output(args)?;
    let (mut ok, mut failed) = (0, 0);

    for src in sources {
        let res = match src {
            Source::Identifier(raw) => {
                let id = normalize_identifier(raw);
                if is_identifier(id) {
                    crawler.fetch_article(id).map_err(anyhow::Error::from)
                } else {
                    Err(anyhow!("unrecognised identifier: {raw}"))
                }
            }
            Source::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))
                .and_then(|html| {
                    article_from_page(&html, None, &path.display().to_string())
                        .map_err(anyhow::Error::from)
                }),
        };

        match res.and_then(|article| render(&article, args.format).map_err(anyhow::Error::from)) {
            Ok(text) => {
                out.write_all(text.as_bytes())?;
                ok += 1;
            }
            Err(e) => {
                report_failure(&source_label(src), &e);
                failed += 1;
            }
        }
    }
    out.flush()?;

    print_summary(ok, failed);
    Ok(())
}

fn is_identifier(s: &str) -> bool {
    s.len() == 10 && s.as_bytes()[4] == b'.' && s.chars().enumerate().all(|(i, c)| i == 4 || c.is_ascii_digit())
}

fn source_label(src: &Source) -> String {
    match src {
        Source::Identifier(id) => id.clone(),
        Source::File(path) => path.display().to_string(),
    }
}

fn print_summary(ok: usize, failed: usize) {
    eprintln!(
        "{}  {}",
        format!("✓ {ok}").if_supports_color(Stream::Stderr, |t| t.green()),
        format!("✗ {failed}").if_supports_color(Stream::Stderr, |t| t.red()),
    );
}
