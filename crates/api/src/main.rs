use std::io::{self, BufRead, BufWriter, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use raqp_api::{logging, ApiError, Args, QueryRequest, QueryResponse, QueryService, Table};
use raqp_query::catalog::load_catalog;
use raqp_query::Catalog;
use tracing::info;

/// Runs queries given as arguments, or serves JSON requests over stdin.
fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = logging::configure_global_logger(args.log_level(), args.log_format) {
        eprintln!("WARNING: logging disabled: {e}");
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), ApiError> {
    let catalog = match &args.catalog {
        Some(path) => load_catalog(&std::fs::read_to_string(path)?)?,
        None => Catalog::new(),
    };
    info!(relations = catalog.len(), "loaded catalog");

    let service = QueryService::new(Arc::new(catalog), args.service_config());
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if args.stdin {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let response = match serde_json::from_str::<QueryRequest>(&line) {
                Ok(request) => respond(&service, &request, args.validate),
                Err(e) => QueryResponse::fallback(ApiError::from(e).to_string()),
            };
            serde_json::to_writer(&mut out, &response)?;
            writeln!(out)?;
            out.flush()?;
        }
        return Ok(());
    }

    for query in args.queries {
        let response = respond(&service, &QueryRequest::new(query), args.validate);
        writeln!(out, "{}", response.text)?;
        write_table(&mut out, &response.table)?;
        out.flush()?;
    }
    Ok(())
}

fn respond(service: &QueryService, request: &QueryRequest, validate: bool) -> QueryResponse {
    if validate {
        service.validate(request)
    } else {
        service.handle(request)
    }
}

/// Writes a table as tab separated lines: the header, then one line per row.
fn write_table(out: &mut impl Write, table: &Table) -> io::Result<()> {
    if table.columns.is_empty() {
        return Ok(());
    }
    writeln!(out, "{}", table.columns.join("\t"))?;
    for row in &table.rows {
        let cells: Vec<String> = row
            .iter()
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        writeln!(out, "{}", cells.join("\t"))?;
    }
    Ok(())
}
