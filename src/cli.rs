use std::env;
use std::path::Path;

use crate::catalog::{load_catalog_dir, MemoryCatalog, DEFAULT_CATALOG_DIR};
use crate::dogma::resolve;
use crate::optimizer::{optimize_iterative, Objective, OptimizeConfig};
use crate::server;
use crate::server::api::{build_fit, FitSpec};
use crate::stats::snapshot;
use crate::validate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Stats,
    Validate,
    Optimize,
    Catalog,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("stats") => Some(Command::Stats),
        Some("validate") => Some(Command::Validate),
        Some("optimize") => Some(Command::Optimize),
        Some("catalog") => Some(Command::Catalog),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(),
        Some(Command::Stats) => handle_stats(args),
        Some(Command::Validate) => handle_validate(args),
        Some(Command::Optimize) => handle_optimize(args),
        Some(Command::Catalog) => handle_catalog(args),
        None => {
            eprintln!("usage: drydock <serve|stats|validate|optimize|catalog>");
            2
        }
    }
}

fn catalog_dir() -> String {
    env::var("DRYDOCK_DATA").unwrap_or_else(|_| DEFAULT_CATALOG_DIR.to_string())
}

fn load_catalog() -> Option<MemoryCatalog> {
    let dir = catalog_dir();
    match load_catalog_dir(Path::new(&dir)) {
        Ok(catalog) => Some(catalog),
        Err(err) => {
            eprintln!("failed to load catalog from '{dir}': {err}");
            None
        }
    }
}

fn load_fit_spec(path: &str) -> Option<FitSpec> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("failed to read fit file '{path}': {err}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(spec) => Some(spec),
        Err(err) => {
            eprintln!("invalid fit file '{path}': {err}");
            None
        }
    }
}

fn handle_serve() -> i32 {
    let Some(catalog) = load_catalog() else {
        return 1;
    };
    let bind_addr = env::var("DRYDOCK_BIND").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    match server::run_server(&bind_addr, catalog) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_stats(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: drydock stats <fit.json>");
        return 2;
    };
    let Some(catalog) = load_catalog() else {
        return 1;
    };
    let Some(spec) = load_fit_spec(path) else {
        return 2;
    };
    let fit = match build_fit(&catalog, &spec) {
        Ok(fit) => fit,
        Err(err) => {
            eprintln!("invalid fit: {err}");
            return 2;
        }
    };
    let resolved = match resolve(&fit, &catalog) {
        Ok(resolved) => resolved,
        Err(err) => {
            eprintln!("resolution failed: {err}");
            return 1;
        }
    };
    let snap = snapshot(&fit, &resolved, &catalog);
    match serde_json::to_string_pretty(&snap) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize stats: {err}");
            1
        }
    }
}

fn handle_validate(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: drydock validate <fit.json>");
        return 2;
    };
    let Some(catalog) = load_catalog() else {
        return 1;
    };
    let Some(spec) = load_fit_spec(path) else {
        return 2;
    };
    let fit = match build_fit(&catalog, &spec) {
        Ok(fit) => fit,
        Err(err) => {
            eprintln!("invalid fit: {err}");
            return 2;
        }
    };
    let resolved = match resolve(&fit, &catalog) {
        Ok(resolved) => resolved,
        Err(err) => {
            eprintln!("resolution failed: {err}");
            return 1;
        }
    };
    let violations = validate(&fit, &resolved, &catalog);
    if violations.is_empty() {
        println!("validation passed: {path}");
        0
    } else {
        eprintln!("validation failed: {} violation(s)", violations.len());
        for violation in violations {
            eprintln!("- {}", violation.message);
        }
        1
    }
}

fn handle_optimize(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: drydock optimize <fit.json> [objective...]");
        return 2;
    };
    let mut objectives = Vec::new();
    for raw in &args[3..] {
        match raw.parse::<Objective>() {
            Ok(objective) => objectives.push(objective),
            Err(err) => {
                eprintln!("{err}");
                return 2;
            }
        }
    }
    let Some(catalog) = load_catalog() else {
        return 1;
    };
    let Some(spec) = load_fit_spec(path) else {
        return 2;
    };
    let mut fit = match build_fit(&catalog, &spec) {
        Ok(fit) => fit,
        Err(err) => {
            eprintln!("invalid fit: {err}");
            return 2;
        }
    };
    let config = OptimizeConfig {
        objectives: if objectives.is_empty() {
            vec![Objective::Dps]
        } else {
            objectives
        },
        ..OptimizeConfig::default()
    };
    match optimize_iterative(&mut fit, &catalog, &config) {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(payload) => {
                println!("{payload}");
                0
            }
            Err(err) => {
                eprintln!("failed to serialize optimization result: {err}");
                1
            }
        },
        Err(err) => {
            eprintln!("optimization failed: {err}");
            1
        }
    }
}

fn handle_catalog(args: &[String]) -> i32 {
    let query = args.get(2).map(String::as_str).unwrap_or("");
    let Some(catalog) = load_catalog() else {
        return 1;
    };
    let hits = catalog.search(query, 50);
    println!(
        "{} item(s), {} effect(s) loaded",
        catalog.item_count(),
        catalog.effect_count()
    );
    for item in hits {
        println!("{}\t{}\t{}", item.id.0, item.category.as_str(), item.name);
    }
    0
}
