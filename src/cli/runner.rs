//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::ApiClient;
use crate::error::{Error, Result};
use crate::loader::{build_client, load_definition};
use crate::options::RequestOptions;
use crate::types::{JsonValue, StringMap};
use std::path::PathBuf;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Validate => self.validate(),
            Commands::Schemas => self.schemas(),
            Commands::Call {
                resource,
                operation,
                params,
                headers,
                query,
                body_json,
                raw,
            } => {
                self.call(
                    resource,
                    operation,
                    params,
                    headers,
                    query,
                    body_json.as_deref(),
                    *raw,
                )
                .await
            }
            Commands::List {
                resource,
                params,
                query,
                max_pages,
            } => self.list(resource, params, query, *max_pages).await,
        }
    }

    fn definition_path(&self) -> Result<&PathBuf> {
        self.cli
            .definition
            .as_ref()
            .ok_or_else(|| Error::config("Definition file not specified (use -d flag)"))
    }

    fn load_client(&self) -> Result<ApiClient> {
        build_client(load_definition(self.definition_path()?)?)
    }

    fn validate(&self) -> Result<()> {
        let def = load_definition(self.definition_path()?)?;
        let schemas = def.schemas.len();
        let resources = def.resources.len();
        let name = def.name.clone();

        // Building also checks type references and auth resolution
        build_client(def)?;

        println!("Definition '{name}' is valid ({schemas} schemas, {resources} resources)");
        Ok(())
    }

    fn schemas(&self) -> Result<()> {
        let client = self.load_client()?;
        for name in client.registry().type_names() {
            println!("{name}");
        }
        Ok(())
    }

    async fn call(
        &self,
        resource: &str,
        operation: &str,
        params: &[String],
        headers: &[String],
        query: &[String],
        body_json: Option<&str>,
        raw: bool,
    ) -> Result<()> {
        let client = self.load_client()?;
        let facade = client.resource(resource)?;
        let params = parse_pairs(params)?;

        let mut opts = RequestOptions::new();
        for (key, value) in parse_pairs(headers)? {
            opts = opts.header(key, value);
        }
        for (key, value) in parse_pairs(query)? {
            opts = opts.query(key, value);
        }
        if let Some(body) = body_json {
            opts = opts.json(serde_json::from_str(body)?);
        }

        if raw {
            let response = facade.raw().execute(operation, &params, opts).await?;
            println!("{}", response.status());
            self.print(&response.json().unwrap_or(JsonValue::Null))?;
        } else {
            let model = facade.execute(operation, &params, opts).await?;
            self.print(model.data())?;
        }

        Ok(())
    }

    async fn list(
        &self,
        resource: &str,
        params: &[String],
        query: &[String],
        max_pages: Option<u32>,
    ) -> Result<()> {
        let client = self.load_client()?;
        let facade = client.resource(resource)?;
        let params = parse_pairs(params)?;

        let mut opts = RequestOptions::new();
        for (key, value) in parse_pairs(query)? {
            opts = opts.query(key, value);
        }

        let mut fetched_pages = 1u32;
        let mut total_records = 0u64;
        let mut page = facade.list_with_params(&params, opts).await?;
        loop {
            total_records += page.len() as u64;
            for item in page.items() {
                self.print(item.data())?;
            }
            if max_pages.is_some_and(|max| fetched_pages >= max) {
                break;
            }
            match page.next().await? {
                Some(next) => {
                    page = next;
                    fetched_pages += 1;
                }
                None => break,
            }
        }

        eprintln!("Fetched {total_records} records over {fetched_pages} page(s)");
        Ok(())
    }

    fn print(&self, value: &JsonValue) -> Result<()> {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{rendered}");
        Ok(())
    }
}

/// Parse repeated `key=value` arguments
fn parse_pairs(pairs: &[String]) -> Result<StringMap> {
    let mut map = StringMap::new();
    for pair in pairs {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            Error::config(format!("expected key=value, got '{pair}'"))
        })?;
        map.insert(key.to_string(), value.to_string());
    }
    Ok(map)
}
