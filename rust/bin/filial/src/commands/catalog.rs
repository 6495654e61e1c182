//! Catalog writes: branches and positions.

use anyhow::Result;
use serde_json::to_string_pretty;
use tracing::warn;

use filial_client::DirectoryClient;

fn fail(e: filial_client::ApiError) -> anyhow::Error {
    warn!("request failed: {}", e);
    anyhow::anyhow!("{}", e.user_message())
}

pub async fn add_branch(client: &DirectoryClient, name: &str, parent: Option<i64>, json: bool) -> Result<()> {
    let branch = client.create_branch(name, parent).await.map_err(fail)?;
    if json {
        println!("{}", to_string_pretty(&branch)?);
    } else {
        println!("branch {} created (#{}).", branch.name, branch.id);
    }
    Ok(())
}

pub async fn move_branch(client: &DirectoryClient, id: i64, parent: Option<i64>, json: bool) -> Result<()> {
    let branch = client.move_branch(id, parent).await.map_err(fail)?;
    if json {
        println!("{}", to_string_pretty(&branch)?);
    } else {
        match branch.parent_id {
            Some(p) => println!("branch {} moved under #{}.", branch.name, p),
            None => println!("branch {} moved to the root level.", branch.name),
        }
    }
    Ok(())
}

pub async fn add_position(client: &DirectoryClient, name: &str, json: bool) -> Result<()> {
    let position = client.create_position(name).await.map_err(fail)?;
    if json {
        println!("{}", to_string_pretty(&position)?);
    } else {
        println!("position {} created (#{}).", position.name, position.id);
    }
    Ok(())
}
