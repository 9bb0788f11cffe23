use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use search_core::dedup::remove_duplicates;
use search_core::paginator::paginate;
use search_core::{DocumentStatus, ExecutionPolicy, RequestQueue, SearchConfig, SearchServer};
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: i32,
    text: String,
    #[serde(default)]
    status: DocumentStatus,
    #[serde(default)]
    ratings: Vec<i32>,
}

#[derive(Parser)]
#[command(name = "search-cli")]
#[command(about = "Load documents and run TF-IDF queries against them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct LoadArgs {
    /// Input path (JSON/JSONL file or directory)
    #[arg(long)]
    input: String,
    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Space-separated stop words, overriding the config
    #[arg(long)]
    stop_words: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run queries given as arguments, or one per stdin line
    Search {
        #[command(flatten)]
        load: LoadArgs,
        /// seq or par
        #[arg(long, default_value = "seq")]
        policy: ExecutionPolicy,
        #[arg(long, default_value = "actual")]
        status: DocumentStatus,
        /// Results printed per page
        #[arg(long, default_value_t = 2)]
        page_size: usize,
        queries: Vec<String>,
    },
    /// Show which plus words of a query each document matches
    Match {
        #[command(flatten)]
        load: LoadArgs,
        #[arg(long, default_value = "seq")]
        policy: ExecutionPolicy,
        query: String,
    },
    /// Remove documents with identical word sets
    Dedup {
        #[command(flatten)]
        load: LoadArgs,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { load, policy, status, page_size, queries } => {
            let (server, config) = load_server(&load)?;
            let queries = if queries.is_empty() { read_queries(io::stdin().lock())? } else { queries };
            run_search(&server, &config, policy, status, page_size, &queries)
        }
        Commands::Match { load, policy, query } => {
            let (server, _) = load_server(&load)?;
            for id in &server {
                let (words, status) = server.match_document_with(policy, &query, id)?;
                println!("{{ document_id = {id}, status = {status}, words = {} }}", words.join(" "));
            }
            Ok(())
        }
        Commands::Dedup { load } => {
            let (mut server, _) = load_server(&load)?;
            let removed = remove_duplicates(&mut server);
            for id in &removed {
                println!("Found duplicate document id {id}");
            }
            println!("{} documents remain", server.document_count());
            Ok(())
        }
    }
}

fn run_search(
    server: &SearchServer,
    config: &SearchConfig,
    policy: ExecutionPolicy,
    status: DocumentStatus,
    page_size: usize,
    queries: &[String],
) -> Result<()> {
    let mut history = RequestQueue::new(config.history_window);
    for query in queries {
        match server.find_top_documents_by(policy, query, status) {
            Ok(found) => {
                history.record(&found);
                println!("Results for request: {query}");
                for page in paginate(&found, page_size) {
                    println!("{page}");
                    println!("Page break");
                }
            }
            Err(e) => println!("Error in request {query:?}: {e}"),
        }
    }
    println!("Total empty requests: {}", history.no_result_requests());
    Ok(())
}

fn read_queries<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut queries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() { continue; }
        queries.push(line.to_string());
    }
    Ok(queries)
}

fn load_server(load: &LoadArgs) -> Result<(SearchServer, SearchConfig)> {
    let mut config = match &load.config {
        Some(path) => SearchConfig::from_json_file(path)?,
        None => SearchConfig::default(),
    };
    if let Some(words) = &load.stop_words {
        config.stop_words = words.split(' ').filter(|w| !w.is_empty()).map(str::to_string).collect();
    }
    let mut server = SearchServer::with_config(&config)?;

    let input_path = Path::new(&load.input);
    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    } else {
        anyhow::bail!("input path {} does not exist", input_path.display());
    }

    for file in files {
        let docs = if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file)?
        } else {
            read_json(&file)?
        };
        for doc in docs {
            server
                .add_document(doc.id, &doc.text, doc.status, &doc.ratings)
                .with_context(|| format!("adding document {} from {}", doc.id, file.display()))?;
        }
    }
    tracing::info!(num_docs = server.document_count(), "documents loaded");
    Ok((server, config))
}

fn read_jsonl(file: &Path) -> Result<Vec<InputDoc>> {
    let reader = BufReader::new(File::open(file)?);
    let mut docs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        docs.push(serde_json::from_str(&line)?);
    }
    Ok(docs)
}

fn read_json(file: &Path) -> Result<Vec<InputDoc>> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    let docs = match json {
        serde_json::Value::Array(arr) => arr
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<InputDoc>, _>>()?,
        serde_json::Value::Object(_) => vec![serde_json::from_value(json)?],
        _ => Vec::new(),
    };
    Ok(docs)
}
