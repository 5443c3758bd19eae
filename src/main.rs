// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `awis-console` command-line front end.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use awis_console::api::{clients, users, webhooks, UserQuery};
use awis_console::auth::{AccessError, AuthContext, Role};
use awis_console::config::ConsoleConfig;
use awis_console::error::{ApiError, Error};
use awis_console::gateway::RequestGateway;
use awis_console::logging;
use awis_console::models::{ApiClientPayload, WebhookCreate, WebhookUpdate};
use awis_console::session::StoreError;

#[derive(Parser)]
#[command(
    name = "awis-console",
    about = "Administrative console for AWIS API clients, webhooks and users",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session
    Login {
        /// API base URL (defaults to the stored one or AWIS_API_BASE_URL)
        #[arg(long)]
        base_url: Option<String>,

        /// Tenant id sent as X-Progem-ID (defaults to the stored one)
        #[arg(long)]
        tenant: Option<u64>,

        /// E-mail or login
        #[arg(long, short = 'u')]
        identifier: String,

        #[arg(long, env = "AWIS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Drop the stored tokens, keeping base URL, tenant and device
    Logout,

    /// Show the signed-in user and roles
    Whoami,

    /// Inspect or change connection settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Manage API clients (requires AWIS)
    Clients {
        #[command(subcommand)]
        action: ClientAction,
    },

    /// Manage webhook endpoints (requires AWIS)
    Webhooks {
        #[command(subcommand)]
        action: WebhookAction,
    },

    /// Manage users and roles (requires AWIS or ADM)
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    SetBaseUrl { url: String },
    SetTenant { tenant: u64 },
    SetDevice { device: String },
    Show,
}

#[derive(clap::Args)]
struct ClientFields {
    #[arg(long)]
    name: String,

    /// Lowercase letters, digits and hyphens (e.g. pax-santacruz)
    #[arg(long)]
    client_id: String,

    /// Head-office tenant id
    #[arg(long)]
    tenant: u64,

    /// Scopes, repeat or separate with spaces
    #[arg(long = "scope", required = true)]
    scopes: Vec<String>,

    /// Domain without scheme (e.g. empresa.com.br)
    #[arg(long)]
    domain: Option<String>,

    #[arg(long, env = "AWIS_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,
}

impl From<ClientFields> for ApiClientPayload {
    fn from(fields: ClientFields) -> Self {
        ApiClientPayload {
            name: fields.name,
            client_id: fields.client_id,
            tenant_id: fields.tenant,
            scopes: fields.scopes.join(" "),
            domain: fields.domain,
            client_secret: fields.client_secret,
        }
    }
}

#[derive(Subcommand)]
enum ClientAction {
    List,
    Show { id: u64 },
    Detail { id: u64 },
    Create(ClientFields),
    Update {
        id: u64,
        #[command(flatten)]
        fields: ClientFields,
    },
    /// Activate or deactivate
    Status {
        id: u64,
        #[arg(long, action = clap::ArgAction::Set)]
        active: bool,
    },
    /// Rotate the client secret; the new secret is shown once
    RotateSecret { id: u64 },
    Units { id: u64 },
    LinkUnit { id: u64, unit_id: u64 },
    UnlinkUnit { id: u64, unit_id: u64 },
    /// Link the head-office unit of a tenant
    LinkMatrix { id: u64, tenant: u64 },
    /// Units of the session tenant
    CompanyUnits,
    /// Print the integrator `.env` snippet for a client
    Env { id: u64 },
}

#[derive(Subcommand)]
enum WebhookAction {
    List {
        #[arg(long)]
        tenant: Option<u64>,
    },
    Show {
        id: u64,
        #[arg(long)]
        tenant: Option<u64>,
    },
    Create {
        /// Defaults to the session tenant
        #[arg(long)]
        tenant: Option<u64>,
        #[arg(long)]
        url: String,
        #[arg(long = "event", required = true)]
        events: Vec<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, env = "AWIS_WEBHOOK_SECRET", hide_env_values = true)]
        secret: Option<String>,
    },
    Update {
        id: u64,
        #[arg(long)]
        tenant: Option<u64>,
        #[arg(long)]
        url: String,
        #[arg(long = "event", required = true)]
        events: Vec<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, action = clap::ArgAction::Set)]
        active: Option<bool>,
    },
    Delete {
        id: u64,
        #[arg(long)]
        tenant: Option<u64>,
    },
    /// Create the default endpoints an API client's tenant is missing
    Provision {
        /// API client whose tenant and domain are used
        client: u64,
        /// Overrides the domain registered on the client
        #[arg(long)]
        domain: Option<String>,
    },
    /// Print the webhook integration notes
    Guide,
}

#[derive(Subcommand)]
enum UserAction {
    List {
        #[arg(long)]
        q: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        tenant: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        size: Option<u32>,
        #[arg(long)]
        sort: Option<String>,
    },
    Roles { user_id: u64 },
    Grant { user_id: u64, role: Role },
    Revoke { user_id: u64, role: Role },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] Error),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Usage(&'static str),

    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    fn user_message(&self) -> String {
        match self {
            CliError::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }

    /// 2 for failures raised locally (usage, missing settings), 1 otherwise.
    fn exit_code(&self) -> ExitCode {
        let local = match self {
            CliError::Usage(_) => true,
            CliError::Api(e) => e.as_api().is_some_and(ApiError::is_client_side),
            _ => false,
        };
        if local {
            ExitCode::from(2)
        } else {
            ExitCode::FAILURE
        }
    }
}

impl From<ApiError> for CliError {
    fn from(e: ApiError) -> Self {
        CliError::Api(e.into())
    }
}

struct Console {
    config: ConsoleConfig,
    gateway: RequestGateway,
    auth: AuthContext,
}

impl Console {
    fn new(config: ConsoleConfig) -> Result<Self, CliError> {
        let store = config.session_store()?;
        let gateway = RequestGateway::from_config(&config, store.clone())?;
        let auth = AuthContext::new(store, gateway.auth_client().clone());
        Ok(Self {
            config,
            gateway,
            auth,
        })
    }

    async fn run(&self, command: Command) -> Result<Value, CliError> {
        match command {
            Command::Login {
                base_url,
                tenant,
                identifier,
                password,
            } => {
                let password = password.ok_or(CliError::Usage(
                    "password required (--password or AWIS_PASSWORD)",
                ))?;
                let current = self.auth.session();
                let base_url = base_url
                    .or_else(|| Some(current.base_url.clone()).filter(|u| !u.is_empty()))
                    .or_else(|| self.config.default_base_url.clone())
                    .ok_or_else(ApiError::base_url_missing)?;
                let tenant = tenant.unwrap_or(current.tenant_id);

                let state = self
                    .auth
                    .sign_in(&base_url, tenant, &identifier, &password)
                    .await?;
                Ok(whoami(&state))
            }
            Command::Logout => {
                self.auth.logout()?;
                Ok(json!({ "signedOut": true }))
            }
            Command::Whoami => Ok(whoami(&self.auth.state())),
            Command::Config { action } => self.config_action(action),
            Command::Clients { action } => {
                self.auth.require_role(Role::Awis)?;
                self.client_action(action).await
            }
            Command::Webhooks { action } => {
                self.auth.require_role(Role::Awis)?;
                self.webhook_action(action).await
            }
            Command::Users { action } => {
                let managers: Vec<Role> = Role::ALL
                    .into_iter()
                    .filter(Role::can_manage_users)
                    .collect();
                self.auth.require_any_role(&managers)?;
                self.user_action(action).await
            }
        }
    }

    fn config_action(&self, action: ConfigAction) -> Result<Value, CliError> {
        let session = match action {
            ConfigAction::SetBaseUrl { url } => self.auth.set_base_url(&url)?,
            ConfigAction::SetTenant { tenant } => self.auth.set_tenant_id(tenant)?,
            ConfigAction::SetDevice { device } => self.auth.set_device_id(&device)?,
            ConfigAction::Show => self.auth.session(),
        };
        Ok(json!({
            "baseUrl": session.base_url,
            "tenantId": session.tenant_id,
            "deviceId": session.device_id,
            "hasAccessToken": session.has_access_token(),
            "hasRefreshToken": session.has_refresh_token(),
        }))
    }

    async fn client_action(&self, action: ClientAction) -> Result<Value, CliError> {
        let gw = &self.gateway;
        match action {
            ClientAction::List => render(clients::list(gw).await?),
            ClientAction::Show { id } => render(clients::get(gw, id).await?),
            ClientAction::Detail { id } => render(clients::detail(gw, id).await?),
            ClientAction::Create(fields) => {
                if fields.client_secret.is_none() {
                    return Err(CliError::Usage(
                        "client secret required (--client-secret or AWIS_CLIENT_SECRET)",
                    ));
                }
                render(clients::create(gw, &fields.into()).await?)
            }
            ClientAction::Update { id, fields } => {
                render(clients::update(gw, id, &fields.into()).await?)
            }
            ClientAction::Status { id, active } => {
                clients::set_status(gw, id, active).await?;
                Ok(json!({ "id": id, "active": active }))
            }
            ClientAction::RotateSecret { id } => render(clients::rotate_secret(gw, id).await?),
            ClientAction::Units { id } => render(clients::units(gw, id).await?),
            ClientAction::LinkUnit { id, unit_id } => {
                clients::link_unit(gw, id, unit_id).await?;
                Ok(json!({ "id": id, "linkedUnit": unit_id }))
            }
            ClientAction::UnlinkUnit { id, unit_id } => {
                clients::unlink_unit(gw, id, unit_id).await?;
                Ok(json!({ "id": id, "unlinkedUnit": unit_id }))
            }
            ClientAction::LinkMatrix { id, tenant } => {
                clients::link_matrix(gw, id, tenant).await?;
                Ok(json!({ "id": id, "linkedMatrix": tenant }))
            }
            ClientAction::CompanyUnits => render(clients::company_units(gw).await?),
            ClientAction::Env { id } => {
                let detail = clients::detail(gw, id).await?;
                let base_url = Some(self.auth.session().base_url)
                    .filter(|u| !u.is_empty())
                    .or_else(|| self.config.default_base_url.clone())
                    .ok_or_else(ApiError::base_url_missing)?;
                Ok(Value::String(clients::env_snippet(&detail, &base_url)))
            }
        }
    }

    async fn webhook_action(&self, action: WebhookAction) -> Result<Value, CliError> {
        let gw = &self.gateway;
        match action {
            WebhookAction::List { tenant } => render(webhooks::list(gw, tenant).await?),
            WebhookAction::Show { id, tenant } => render(webhooks::get(gw, id, tenant).await?),
            WebhookAction::Create {
                tenant,
                url,
                events,
                description,
                secret,
            } => {
                let body = WebhookCreate {
                    tenant_id: tenant.unwrap_or_else(|| self.auth.session().tenant_id),
                    url: url.trim().to_string(),
                    events,
                    description,
                    secret,
                };
                render(webhooks::create(gw, &body).await?)
            }
            WebhookAction::Update {
                id,
                tenant,
                url,
                events,
                description,
                active,
            } => {
                let body = WebhookUpdate {
                    tenant_id: tenant.unwrap_or_else(|| self.auth.session().tenant_id),
                    url: url.trim().to_string(),
                    events,
                    description,
                    active,
                };
                render(webhooks::update(gw, id, &body).await?)
            }
            WebhookAction::Delete { id, tenant } => {
                webhooks::delete(gw, id, tenant).await?;
                Ok(json!({ "id": id, "deleted": true }))
            }
            WebhookAction::Provision { client, domain } => {
                let detail = clients::detail(gw, client).await?;
                let domain = domain.or(detail.domain);
                let created =
                    webhooks::provision_defaults(gw, detail.tenant_id, domain.as_deref()).await?;
                Ok(json!({
                    "tenantId": detail.tenant_id,
                    "url": domain.as_deref().and_then(webhooks::default_url),
                    "created": render(created)?,
                }))
            }
            WebhookAction::Guide => Ok(Value::String(webhooks::GUIDE.to_string())),
        }
    }

    async fn user_action(&self, action: UserAction) -> Result<Value, CliError> {
        let gw = &self.gateway;
        match action {
            UserAction::List {
                q,
                status,
                role,
                tenant,
                page,
                size,
                sort,
            } => {
                let query = UserQuery {
                    q,
                    status,
                    role,
                    tenant_id: tenant,
                    page,
                    size,
                    sort,
                };
                render(users::list(gw, &query).await?)
            }
            UserAction::Roles { user_id } => render(users::roles(gw, user_id).await?),
            UserAction::Grant { user_id, role } => render(users::grant(gw, user_id, role).await?),
            UserAction::Revoke { user_id, role } => {
                render(users::revoke(gw, user_id, role).await?)
            }
        }
    }
}

fn render<T: Serialize>(value: T) -> Result<Value, CliError> {
    Ok(serde_json::to_value(value)?)
}

/// Session summary without the tokens.
fn whoami(state: &awis_console::auth::AuthState) -> Value {
    let claims = state.claims.as_ref();
    json!({
        "authenticated": state.is_authed,
        "baseUrl": state.session.base_url,
        "tenantId": state.session.tenant_id,
        "deviceId": state.session.device_id,
        "subject": claims.and_then(|c| c.subject.clone()),
        "roles": state.roles(),
        "knownRoles": claims.map(|c| c.known_roles()).unwrap_or_default(),
        "expiresAt": claims.and_then(|c| c.expires_at),
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = ConsoleConfig::from_env();
    logging::init(config.log_format);

    let result = match Console::new(config) {
        Ok(console) => console.run(cli.command).await,
        Err(e) => Err(e),
    };

    let output = result.and_then(|value| match value {
        Value::String(text) => Ok(text),
        other => Ok(serde_json::to_string_pretty(&other)?),
    });
    match output {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("error: {}", e.user_message());
            e.exit_code()
        }
    }
}
