//! `get_organization_info` — report locally configured organization
//! details.  No upstream call.

use serde_json::{json, Value};

use crate::tools::ToolContext;

pub async fn run(ctx: &ToolContext, _args: &Value) -> anyhow::Result<Value> {
    Ok(json!({
        "organization": ctx.config.org_name,
        "base_url": ctx.config.devin_base_url,
    }))
}
