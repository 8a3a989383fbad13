use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};
use wordcounter_core::{
    discover_ignore_file, CountOptions, Counter, DirCounter, ExportKind, ExportOutput, Exporter,
    FileCounter, IgnoreMatcher, PathDisplay, Server, DEFAULT_HOST, DEFAULT_PORT,
};

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "wcg", version, about = "中文字符统计工具")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 统计文件或目录中的中文字符
    Count {
        /// 文件或目录路径
        path: PathBuf,

        /// 统计模式：dir 或 file
        #[arg(short, long, default_value = "dir", value_parser = ["dir", "file"])]
        mode: String,

        /// 导出类型：table、csv 或 excel
        #[arg(short, long, default_value = "table", value_parser = ["table", "csv", "excel"])]
        export: String,

        /// 导出文件路径（excel 默认 counter.xlsx；csv 未指定时只打印）
        #[arg(long)]
        export_path: Option<PathBuf>,

        /// 额外的忽略规则，可重复
        #[arg(long)]
        exclude: Vec<String>,

        /// 追加 Total 汇总行（仅目录模式）
        #[arg(long)]
        total: bool,

        /// 显示相对路径
        #[arg(short, long)]
        relative: bool,

        /// 线程数（"auto"=CPU 核心数）
        #[arg(long, default_value = "auto")]
        threads: String,
    },

    /// 启动 HTTP 服务
    Server {
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,

        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

fn main() -> Result<()> {
    // 初始化日志（支持通过 RUST_LOG 控制等级，例如 info、debug）
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Count { path, mode, export, export_path, exclude, total, relative, threads } => {
            info!(?path, %mode, %export, "starting count");

            let display = if relative { PathDisplay::Relative } else { PathDisplay::Absolute };
            let mut counter = match mode.as_str() {
                "file" => Counter::File(FileCounter::new(&path, display)),
                _ => {
                    // .wcignore 在前，命令行 --exclude 在后
                    let mut patterns = discover_ignore_file();
                    patterns.extend(exclude);
                    debug!(?patterns, "ignore patterns");
                    let opts = CountOptions {
                        threads: parse_threads(&threads),
                        path_display: display,
                        include_total: total,
                        ..Default::default()
                    };
                    let ignore = IgnoreMatcher::from_patterns(patterns);
                    Counter::Dir(DirCounter::new(&path, ignore, opts))
                }
            };
            counter.count().with_context(|| format!("count failed: {}", path.display()))?;

            let kind: ExportKind = export.parse()?;
            match Exporter::new(kind, export_path).export(&counter).context("export failed")? {
                ExportOutput::Text(text) => println!("{text}"),
                ExportOutput::File(p) => println!("Excel file exported to: {}", p.display()),
            }
        }
        Commands::Server { host, port } => {
            let server = Server::bind(&host, port).context("start server")?;
            server.serve().context("server stopped")?;
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // 日志写到 stderr，stdout 只保留统计结果
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 解析线程参数
fn parse_threads(s: &str) -> Option<usize> {
    if s.eq_ignore_ascii_case("auto") {
        return None;
    }
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Some(n),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threads_arg() {
        assert_eq!(parse_threads("auto"), None);
        assert_eq!(parse_threads("AUTO"), None);
        assert_eq!(parse_threads("4"), Some(4));
        assert_eq!(parse_threads("0"), None);
        assert_eq!(parse_threads("x"), None);
    }

    #[test]
    fn cli_parses_count_flags() {
        let cli = Cli::try_parse_from([
            "wcg", "count", "docs", "-e", "csv", "--exclude", "*.go", "--exclude", "/a", "--total",
            "-r",
        ])
        .unwrap();
        match cli.command {
            Commands::Count { path, mode, export, exclude, total, relative, .. } => {
                assert_eq!(path, PathBuf::from("docs"));
                assert_eq!(mode, "dir");
                assert_eq!(export, "csv");
                assert_eq!(exclude, vec!["*.go", "/a"]);
                assert!(total && relative);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["wcg", "count", ".", "-m", "text"]).is_err());
    }

    #[test]
    fn server_defaults() {
        let cli = Cli::try_parse_from(["wcg", "server"]).unwrap();
        match cli.command {
            Commands::Server { host, port } => {
                assert_eq!((host.as_str(), port), (DEFAULT_HOST, DEFAULT_PORT));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
