use clap::{Parser, Subcommand};
use formflow::engine::value_text;
use formflow::prelude::*;
use formflow::protocol::DescriptionKind;
use formflow::schema::{locate_next, locate_node, locate_start};
use formflow::server;
use serde_json::json;
use std::fs;
use std::io::{self, Write};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Serve conversational forms as wallet actions, or try them out locally
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve every form in a directory over HTTP
    Serve {
        /// Directory holding one JSON form record per file
        #[arg(long, env = "FORMFLOW_FORMS_DIR", default_value = "demos/forms")]
        forms: String,

        /// Port to listen on
        #[arg(short, long, env = "FORMFLOW_PORT", default_value_t = 8080)]
        port: u16,

        /// Optional JSON engine config; flags below override it
        #[arg(short, long, env = "FORMFLOW_CONFIG")]
        config: Option<String>,

        /// Public scheme and host used in generated links
        #[arg(long, env = "FORMFLOW_PUBLIC_URL")]
        public_url: Option<String>,

        /// Skip every transaction and only record answers
        #[arg(long, env = "FORMFLOW_DEMO_MODE")]
        demo: bool,

        /// Redis URL for the session store; sessions stay in memory without it
        #[cfg(feature = "redis-store")]
        #[arg(long, env = "FORMFLOW_REDIS_URL")]
        redis_url: Option<String>,
    },

    /// Print the action description of one node of a form
    Describe {
        /// Path to the form record JSON file
        form_path: String,

        /// Node to describe; defaults to the start node
        #[arg(short, long)]
        node: Option<String>,

        /// Describe as demo mode would
        #[arg(long)]
        demo: bool,
    },

    /// Walk through a form interactively, answering each step at the prompt
    Walk {
        /// Path to the form record JSON file
        form_path: String,

        /// Account the answers are recorded for
        #[arg(short, long, default_value = "cli-walker")]
        account: String,

        /// Skip the transaction at the end
        #[arg(long)]
        demo: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve {
            forms,
            port,
            config,
            public_url,
            demo,
            #[cfg(feature = "redis-store")]
            redis_url,
        } => {
            let mut engine_config = match config {
                Some(path) => EngineConfig::from_file(&path)
                    .unwrap_or_else(|e| exit_with_error(&e.to_string())),
                None => EngineConfig::default(),
            };
            if let Some(url) = public_url {
                engine_config = engine_config.with_public_url(url);
            }
            if demo {
                engine_config = engine_config.with_demo_mode(true);
            }

            let source = MemoryFormSource::from_dir(&forms).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to load forms from '{}': {}", forms, e))
            });
            info!(count = source.len(), dir = %forms, "forms loaded");

            #[allow(unused_mut)]
            let mut builder = FlowEngine::builder(Arc::new(source)).with_config(engine_config);
            #[cfg(feature = "redis-store")]
            if let Some(url) = redis_url {
                let store = formflow::session::RedisSessionStore::connect(&url)
                    .await
                    .unwrap_or_else(|e| {
                        exit_with_error(&format!("Failed to connect to Redis: {}", e))
                    });
                builder = builder.with_session_store(Arc::new(store));
            }

            serve(Arc::new(builder.build()), port).await;
        }
        Command::Describe {
            form_path,
            node,
            demo,
        } => describe(&form_path, node.as_deref(), demo),
        Command::Walk {
            form_path,
            account,
            demo,
        } => walk(&form_path, &account, demo).await,
    }
}

async fn serve(engine: Arc<FlowEngine>, port: u16) {
    let app = server::router(engine);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to bind {}: {}", addr, e)));
    info!(%addr, "listening");
    if let Err(e) = axum::serve(listener, app).await {
        exit_with_error(&format!("Server error: {}", e));
    }
}

fn describe(form_path: &str, node_id: Option<&str>, demo: bool) {
    let form = load_form(form_path);
    let config = EngineConfig::default().with_demo_mode(demo);

    let node = match node_id {
        Some(id) => locate_node(&form.schema, id)
            .unwrap_or_else(|| exit_with_error(&format!("Node '{}' not found", id))),
        None => locate_start(&form.schema)
            .unwrap_or_else(|| exit_with_error("The form has no start node")),
    };
    let next = locate_next(&form.schema, &node.id).and_then(|id| locate_node(&form.schema, id));
    let description =
        formflow::protocol::describe_node(&form, node, next, &Answers::default(), &config);

    let rendered = serde_json::to_string_pretty(&description)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to render description: {}", e)));
    println!("{}", rendered);
}

/// Runs a form end to end against in-memory stores.
async fn walk(form_path: &str, account: &str, demo: bool) {
    let form = load_form(form_path);
    let form_id = form.id.clone();
    let sink = Arc::new(MemorySubmissionSink::new());
    let engine = FlowEngine::builder(Arc::new(MemoryFormSource::new().with_form(form)))
        .with_submission_sink(sink.clone())
        .with_config(EngineConfig::default().with_demo_mode(demo))
        .build();

    println!("--- FormFlow Walkthrough: {} ---", form_id);
    loop {
        let description = engine
            .describe(&form_id, Some(account))
            .await
            .unwrap_or_else(|e| exit_with_error(&e.to_string()));

        println!("\n{}", description.title);
        if !description.description.is_empty() {
            println!("  {}", description.description);
        }
        if description.kind == DescriptionKind::Completed {
            break;
        }

        let actions = description.actions();
        let request = match actions {
            [] => exit_with_error("The current step offers no actions"),
            [single] if !single.parameters.is_empty() => {
                let label = &single.parameters[0].label;
                let value = prompt_for_input(label, None);
                RequestData::from_body(json!({ "account": account, "value": value }))
            }
            many => {
                for (index, action) in many.iter().enumerate() {
                    println!("  {}: {}", index + 1, action.label);
                }
                let picked = loop {
                    let choice = prompt_for_input("Enter choice", Some("1"));
                    match choice.trim().parse::<usize>() {
                        Ok(n) if (1..=many.len()).contains(&n) => break &many[n - 1],
                        _ => println!("Invalid choice. Please enter 1 to {}.", many.len()),
                    }
                };
                // Choice actions carry their option as the last path segment.
                let choice_base = format!("{}/", engine.config().action_href(&form_id));
                let request = RequestData::from_body(json!({ "account": account }));
                match picked.href.strip_prefix(&choice_base) {
                    Some(segment) => {
                        let choice = urlencoding::decode(segment)
                            .map(|c| c.into_owned())
                            .unwrap_or_else(|_| segment.to_string());
                        request.with_choice(choice)
                    }
                    None => request,
                }
            }
        };

        let response = engine
            .submit(&form_id, request)
            .await
            .unwrap_or_else(|e| exit_with_error(&e.to_string()));
        match &response {
            ActionResponse::Error(_) => println!("  !! {}", response.message()),
            ActionResponse::Transaction(tx) => {
                println!("  -> {}", tx.message);
                println!("  -> Unsigned transaction: {}", tx.transaction);
                break;
            }
            ActionResponse::Post(_) => {
                println!("  -> {}", response.message());
                if response.next_href().is_none() {
                    break;
                }
            }
        }
    }

    let submissions = sink.submissions().await;
    println!("\n--- Recorded Submissions: {} ---", submissions.len());
    for submission in submissions {
        for (node_id, answer) in &submission.answers {
            println!("  {}: {}", node_id, value_text(Some(answer)));
        }
    }
}

fn load_form(form_path: &str) -> Form {
    let content = fs::read_to_string(form_path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read form file '{}': {}", form_path, e))
    });
    Form::from_json(&content)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse form: {}", e)))
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    if let Err(e) = io::stdout().flush() {
        exit_with_error(&format!("Failed to write prompt: {}", e));
    }
    if let Err(e) = io::stdin().read_line(&mut line) {
        exit_with_error(&format!("Failed to read line: {}", e));
    }
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
