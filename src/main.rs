use anyhow::Context;
use clap::Parser;
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fedinorm::api::{self, instance_host};
use fedinorm::config::Config;
use fedinorm::models::Credentials;
use fedinorm::snapshot::{ProfileSnapshot, StatusSnapshot};
use fedinorm::{select_profile_adapter, select_status_adapter, thread};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Инициализируем логирование
    init_tracing();

    // Парсим конфигурацию из CLI и env
    let config = Config::parse();
    config.validate()?;

    let credentials = Credentials {
        instance: config.instance.clone().unwrap_or_default(),
        access_token: config.token.clone(),
    };
    let my_subdomain = config.instance.as_deref().map(instance_host);

    info!(
        "Starting fedinorm - backend: {:?}, instance: {}",
        config.backend,
        config.instance.as_deref().unwrap_or("<default>")
    );

    let client = api::create_api_client(config.backend, credentials)?;

    let output = if let Some(id) = &config.profile {
        let raw = client
            .get_profile(id)
            .await
            .with_context(|| format!("fetching profile {}", id))?;
        if config.raw {
            raw
        } else {
            let profile = select_profile_adapter(raw, config.backend);
            serde_json::to_value(ProfileSnapshot::capture(profile.as_ref(), my_subdomain))?
        }
    } else if let Some(id) = &config.status {
        if config.context {
            // Два независимых запроса, первая ошибка прерывает оба
            let (raw, context) =
                tokio::try_join!(client.get_status(id), client.get_status_context(id))
                    .with_context(|| format!("fetching thread of {}", id))?;
            if config.raw {
                json!({
                    "status": raw,
                    "ancestors": context.ancestors,
                    "descendants": context.descendants,
                })
            } else {
                let thread = thread::assemble(raw, context, config.backend);
                let capture = |s: &dyn fedinorm::Status| StatusSnapshot::capture(s, my_subdomain);
                json!({
                    "status": capture(thread.focal.as_ref()),
                    "ancestors": thread.ancestors.iter().map(|s| capture(s.as_ref())).collect::<Vec<_>>(),
                    "replies": thread.focal_replies().iter().map(|s| capture(s.as_ref())).collect::<Vec<_>>(),
                })
            }
        } else {
            let raw = client
                .get_status(id)
                .await
                .with_context(|| format!("fetching status {}", id))?;
            if config.raw {
                raw
            } else {
                let status = select_status_adapter(raw, config.backend);
                serde_json::to_value(StatusSnapshot::capture(status.as_ref(), my_subdomain))?
            }
        }
    } else {
        Value::Null
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Инициализирует систему логирования с использованием tracing.
/// Логи идут в stderr, stdout остаётся для JSON.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .init();
}
