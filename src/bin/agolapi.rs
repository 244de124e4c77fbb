//! Agola gateway API CLI binary.
//!
//! A command-line interface for interacting with the Agola gateway API.

use agolapi::cli::{run_filter, Cli, Command, CreateArgs, Entity, Owner, OwnerArgs, PageArgs};
use agolapi::{
    AgolaClient, AgolaError, CreateOrgRequest, CreateProjectRequest, CreateRemoteSourceRequest,
    CreateUserLaRequest, CreateUserRequest, CreateUserTokenRequest, PrettyPrint, Project,
    RawResponse, RemoteSourceResponse, RunsResponseItem, UserResponse,
};
use clap::Parser;
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let client = match build_client(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set AGOLA_TOKEN environment variable or pass --token");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build_client(cli: &Cli) -> agolapi::Result<AgolaClient> {
    let token = cli
        .token
        .as_deref()
        .ok_or_else(|| AgolaError::Config("API token not set".to_string()))?;
    AgolaClient::new(&cli.gateway_url, token)
}

async fn run(client: &AgolaClient, cli: Cli) -> agolapi::Result<()> {
    let json = cli.json;
    match cli.command {
        Command::Get { entity, id } => handle_get(client, entity, &id, json).await,
        Command::List {
            entity,
            owner,
            page,
            phases,
            groups,
            run_groups,
        } => {
            let filter = run_filter(&phases, &groups, &run_groups);
            handle_list(client, entity, &owner, &page, filter, json).await
        }
        Command::Create {
            entity,
            name,
            owner,
            args,
        } => handle_create(client, entity, &name, &owner, args, json).await,
        Command::Delete {
            entity,
            name,
            owner,
            id,
        } => handle_delete(client, entity, &name, &owner, id.as_deref()).await,
        Command::Reconfig { project } => {
            let response = client.reconfig_project(&project).await?;
            report_done("reconfigured", &project, &response);
            Ok(())
        }
    }
}

fn unsupported(action: &str, entity: Entity) -> AgolaError {
    AgolaError::Config(format!("cannot {action} {entity:?}"))
}

fn required(value: Option<String>, flag: &str) -> agolapi::Result<String> {
    value.ok_or_else(|| AgolaError::Config(format!("{flag} is required")))
}

async fn handle_get(
    client: &AgolaClient,
    entity: Entity,
    id: &str,
    json: bool,
) -> agolapi::Result<()> {
    match entity {
        Entity::Project => output_single(&client.get_project(id).await?.data, json),
        Entity::User => output_single(&client.get_user(id).await?.data, json),
        Entity::Run => output_single(&client.get_run(id).await?.data, json),
        Entity::RemoteSource => output_single(&client.get_remote_source(id).await?.data, json),
        other => Err(unsupported("get", other)),
    }
}

async fn handle_list(
    client: &AgolaClient,
    entity: Entity,
    owner: &OwnerArgs,
    page: &PageArgs,
    filter: agolapi::RunFilter,
    json: bool,
) -> agolapi::Result<()> {
    let opts = page.list_options();

    match entity {
        Entity::Project => {
            let resp = match owner.owner() {
                Owner::CurrentUser => client.get_current_user_projects(&opts).await?,
                Owner::User(user) => client.get_user_projects(&user, &opts).await?,
                Owner::Org(org) => client.get_org_projects(&org, &opts).await?,
            };
            output_list(&resp.data.projects, json, |p| ProjectRow::from(p))
        }
        Entity::User => {
            let resp = client.get_users(&opts).await?;
            output_list(&resp.data, json, |u| UserRow::from(u))
        }
        Entity::Run => {
            let resp = client.get_runs(&filter, &opts).await?;
            output_list(&resp.data.runs, json, |r| RunRow::from(r))
        }
        Entity::RemoteSource => {
            let resp = client.get_remote_sources(&opts).await?;
            output_list(&resp.data, json, |rs| RemoteSourceRow::from(rs))
        }
        other => Err(unsupported("list", other)),
    }
}

async fn handle_create(
    client: &AgolaClient,
    entity: Entity,
    name: &str,
    owner: &OwnerArgs,
    args: CreateArgs,
    json: bool,
) -> agolapi::Result<()> {
    match entity {
        Entity::Project => {
            let req = CreateProjectRequest {
                name: name.to_string(),
                remote_source_name: required(args.remote_source, "--remote-source")?,
                repo_path: required(args.repo_path, "--repo-path")?,
                skip_ssh_host_key_check: args.skip_ssh_host_key_check,
            };
            let resp = match owner.owner() {
                Owner::CurrentUser => client.create_current_user_project(&req).await?,
                Owner::User(user) => client.create_user_project(&user, &req).await?,
                Owner::Org(org) => client.create_org_project(&org, &req).await?,
            };
            output_single(&resp.data, json)
        }
        Entity::User => {
            let req = CreateUserRequest {
                user_name: name.to_string(),
            };
            output_single(&client.create_user(&req).await?.data, json)
        }
        Entity::Org => {
            let req = CreateOrgRequest {
                name: name.to_string(),
            };
            output_single(&client.create_org(&req).await?.data, json)
        }
        Entity::Token => {
            let user = required(owner.user.clone(), "--user")?;
            let req = CreateUserTokenRequest {
                token_name: name.to_string(),
            };
            output_single(&client.create_user_token(&user, &req).await?.data, json)
        }
        Entity::LinkedAccount => {
            let req = CreateUserLaRequest {
                remote_source_name: required(args.remote_source, "--remote-source")?,
                remote_source_login_name: args.login_name.unwrap_or_default(),
                remote_source_login_password: args.password.unwrap_or_default(),
            };
            output_single(
                &client.create_user_linked_account(name, &req).await?.data,
                json,
            )
        }
        Entity::RemoteSource => {
            let req = CreateRemoteSourceRequest {
                name: name.to_string(),
                source_type: required(args.source_type, "--type")?,
                api_url: required(args.api_url, "--api-url")?,
                auth_type: required(args.auth_type, "--auth-type")?,
                skip_verify: args.skip_verify,
                oauth2_client_id: args.client_id,
                oauth2_client_secret: args.client_secret,
            };
            output_single(&client.create_remote_source(&req).await?.data, json)
        }
        Entity::Run => Err(unsupported("create", entity)),
    }
}

async fn handle_delete(
    client: &AgolaClient,
    entity: Entity,
    name: &str,
    owner: &OwnerArgs,
    id: Option<&str>,
) -> agolapi::Result<()> {
    let response = match entity {
        Entity::Project => match owner.owner() {
            Owner::CurrentUser => client.delete_current_user_project(name).await?,
            Owner::User(user) => client.delete_user_project(&user, name).await?,
            Owner::Org(org) => client.delete_org_project(&org, name).await?,
        },
        Entity::User => client.delete_user(name).await?,
        Entity::Org => client.delete_org(name).await?,
        Entity::RemoteSource => client.delete_remote_source(name).await?,
        Entity::LinkedAccount => {
            let id = id.ok_or_else(|| AgolaError::Config("--id is required".to_string()))?;
            client.delete_user_linked_account(name, id).await?
        }
        other => return Err(unsupported("delete", other)),
    };
    report_done("deleted", name, &response);
    Ok(())
}

fn report_done(action: &str, name: &str, response: &RawResponse) {
    println!("{name} {action} ({})", response.status());
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> agolapi::Result<()> {
    if json {
        println!("{}", to_json(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_list<T, R, F>(items: &[T], json: bool, to_row: F) -> agolapi::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", to_json(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} items", items.len());
    }
    Ok(())
}

fn to_json<T: Serialize + ?Sized>(item: &T) -> agolapi::Result<String> {
    serde_json::to_string_pretty(item).map_err(AgolaError::Marshal)
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct ProjectRow {
    id: String,
    name: String,
    path: String,
}

impl From<&Project> for ProjectRow {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            path: p.path.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct UserRow {
    id: String,
    username: String,
}

impl From<&UserResponse> for UserRow {
    fn from(u: &UserResponse) -> Self {
        Self {
            id: u.id.clone(),
            username: u.username.clone(),
        }
    }
}

#[derive(Tabled)]
struct RunRow {
    id: String,
    counter: u64,
    name: String,
    phase: String,
    result: String,
}

impl From<&RunsResponseItem> for RunRow {
    fn from(r: &RunsResponseItem) -> Self {
        Self {
            id: r.id.clone(),
            counter: r.counter,
            name: r.name.clone(),
            phase: r.phase.to_string(),
            result: r.result.to_string(),
        }
    }
}

#[derive(Tabled)]
struct RemoteSourceRow {
    id: String,
    name: String,
    #[tabled(rename = "auth")]
    auth_type: String,
}

impl From<&RemoteSourceResponse> for RemoteSourceRow {
    fn from(rs: &RemoteSourceResponse) -> Self {
        Self {
            id: rs.id.clone(),
            name: rs.name.clone(),
            auth_type: rs.auth_type.clone().unwrap_or_default(),
        }
    }
}
