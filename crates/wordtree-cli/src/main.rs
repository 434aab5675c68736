//! Menu tree command-line tool.
//!
//! Provides the `wordtree` binary. Every subcommand is a single engine call
//! against a SQLite menu database and prints its result as JSON on stdout.
//! Diagnostics and logs go to stderr.
//!
//! Menu items are addressed by id paths from the root, e.g. `1/4/9`.

mod config;

use std::process;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use wordtree_core::{Depth, MenuPath, NodeId, TraversalOrder};
use wordtree_engine::{EngineError, MenuEngine};
use wordtree_storage::SqliteStore;

use crate::config::{Backing, Settings};

/// Ordered menu tree tools.
#[derive(Parser)]
#[command(name = "wordtree", about = "Ordered menu tree tools")]
struct Cli {
    /// Path to the menu database file (overrides WORDTREE_DB_PATH).
    #[arg(long, global = true)]
    db: Option<String>,

    /// Use a throwaway in-memory database.
    #[arg(long, global = true)]
    in_memory: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Create the root menu if it does not exist yet.
    Init,
    /// Show a single menu item.
    Show { path: String },
    /// List the direct children of a menu item in rank order.
    Children { path: String },
    /// List a menu item and its ancestors up to the root.
    Ancestors { path: String },
    /// List everything below a menu item.
    Descendants {
        path: String,
        /// Emit children before their parents.
        #[arg(long)]
        post: bool,
        /// Stop after this many levels.
        #[arg(long)]
        depth: Option<u32>,
    },
    /// Print the subtree below a menu item as nested JSON.
    Tree {
        #[arg(default_value = "1")]
        path: String,
        #[arg(long)]
        depth: Option<u32>,
    },
    /// Node and edge counts plus the whole tree.
    Report,
    /// Append a new item at the end of a menu.
    Add { path: String, name: String },
    /// Rename a menu item.
    Rename { path: String, name: String },
    /// Replace the payload text of a menu item.
    SetPayload { path: String, text: String },
    /// Delete a menu item and everything below it.
    Delete { path: String },
    /// Swap a menu item with its next sibling.
    MoveNext { path: String },
    /// Swap a menu item with its previous sibling.
    MovePrev { path: String },
    /// Move a menu item to the end of another menu.
    Reparent { path: String, new_parent: String },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env(cli.db, cli.in_memory);

    let exit_code = match run(&settings, cli.command) {
        Ok(output) => {
            let json = serde_json::to_string_pretty(&output).unwrap_or_else(|e| {
                format!("{{\"error\": \"failed to serialize result: {}\"}}", e)
            });
            println!("{}", json);
            0
        }
        Err(err) => {
            eprintln!("{}", json!({ "error": err.kind(), "message": err.to_string() }));
            exit_code(&err)
        }
    };
    process::exit(exit_code);
}

/// Exit code for a failed command: 1 = invalid operation, 2 = not found,
/// 3 = store failure.
fn exit_code(err: &EngineError) -> i32 {
    match err {
        EngineError::InvalidOperation(_) => 1,
        EngineError::NotFound(_) => 2,
        EngineError::StoreFailure(_) => 3,
    }
}

fn open(settings: &Settings) -> Result<MenuEngine<SqliteStore>, EngineError> {
    tracing::debug!(backing = ?settings.backing, "opening menu store");
    let store = match &settings.backing {
        Backing::File(path) => SqliteStore::new(path)?,
        Backing::InMemory => SqliteStore::in_memory()?,
    };
    let mut engine = MenuEngine::with_config(store, settings.engine.clone());
    engine.ensure_root()?;
    Ok(engine)
}

/// Parses and resolves an id path, returning the full path and its target.
fn locate(
    engine: &MenuEngine<SqliteStore>,
    raw: &str,
) -> Result<(MenuPath, NodeId), EngineError> {
    let path = MenuPath::parse(raw)?;
    let id = engine.resolve_path(&path)?;
    Ok((path, id))
}

/// The parent named by a path, for sibling moves.
fn parent_in(path: &MenuPath) -> Result<NodeId, EngineError> {
    path.segments()
        .iter()
        .rev()
        .nth(1)
        .copied()
        .ok_or_else(|| EngineError::InvalidOperation("the root menu has no siblings".to_string()))
}

fn to_json<T: serde::Serialize>(value: T) -> Result<Value, EngineError> {
    serde_json::to_value(value)
        .map_err(|e| EngineError::InvalidOperation(format!("unserializable result: {}", e)))
}

fn run(settings: &Settings, command: Commands) -> Result<Value, EngineError> {
    let mut engine = open(settings)?;

    match command {
        Commands::Init => to_json(engine.node(NodeId::ROOT)?),
        Commands::Show { path } => {
            let (path, id) = locate(&engine, &path)?;
            Ok(json!({ "path": path.to_string(), "node": to_json(engine.node(id)?)? }))
        }
        Commands::Children { path } => {
            let (_, id) = locate(&engine, &path)?;
            to_json(engine.children(id)?)
        }
        Commands::Ancestors { path } => {
            let (_, id) = locate(&engine, &path)?;
            to_json(engine.ancestors(id)?)
        }
        Commands::Descendants { path, post, depth } => {
            let (_, id) = locate(&engine, &path)?;
            let order = if post {
                TraversalOrder::Post
            } else {
                TraversalOrder::Pre
            };
            to_json(engine.descendants(id, order, Depth::from_option(depth))?)
        }
        Commands::Tree { path, depth } => {
            let (_, id) = locate(&engine, &path)?;
            let (tree, count) = engine.build_tree_to_depth(id, Depth::from_option(depth))?;
            Ok(json!({ "count": count, "tree": to_json(tree)? }))
        }
        Commands::Report => to_json(engine.report()?),
        Commands::Add { path, name } => {
            let (_, parent) = locate(&engine, &path)?;
            let node = engine.add_child(parent, &name)?;
            let path = engine.path_of(node.id)?;
            Ok(json!({ "path": path.to_string(), "node": to_json(node)? }))
        }
        Commands::Rename { path, name } => {
            let (_, id) = locate(&engine, &path)?;
            to_json(engine.rename_node(id, &name)?)
        }
        Commands::SetPayload { path, text } => {
            let (_, id) = locate(&engine, &path)?;
            to_json(engine.set_payload(id, &text)?)
        }
        Commands::Delete { path } => {
            let (_, id) = locate(&engine, &path)?;
            Ok(json!({ "deleted": to_json(engine.delete_subtree(id)?)? }))
        }
        Commands::MoveNext { path } => {
            let (path, id) = locate(&engine, &path)?;
            let moved = engine.move_next(id, parent_in(&path)?)?;
            Ok(json!({ "moved": moved }))
        }
        Commands::MovePrev { path } => {
            let (path, id) = locate(&engine, &path)?;
            let moved = engine.move_prev(id, parent_in(&path)?)?;
            Ok(json!({ "moved": moved }))
        }
        Commands::Reparent { path, new_parent } => {
            let (_, id) = locate(&engine, &path)?;
            let (_, parent) = locate(&engine, &new_parent)?;
            let path = engine.reparent(id, parent)?;
            Ok(json!({ "path": path.to_string() }))
        }
    }
}
