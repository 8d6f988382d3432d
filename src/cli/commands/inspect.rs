//! `regseal inspect`: decode an envelope's structure without any keys.

use serde_json::json;

use crate::cli::output;
use crate::cli::{read_input, Cli};
use crate::errors::{RegSealError, Result};
use crate::protocol::Envelope;

/// Execute the `inspect` command.
pub fn execute(_cli: &Cli, envelope: Option<&str>, as_json: bool) -> Result<()> {
    let encoded = read_input(envelope, "envelope")?;
    let envelope = Envelope::from_base64(&encoded)?;

    if as_json {
        println!("{}", render_json(&envelope)?);
    } else {
        output::print_envelope_table(&envelope);
    }

    Ok(())
}

/// Render element sizes as pretty JSON, in wire order.
fn render_json(envelope: &Envelope) -> Result<String> {
    let fields: Vec<_> = output::envelope_fields(envelope)
        .iter()
        .map(|(name, bytes)| json!({ "field": name, "bytes": bytes.len() }))
        .collect();

    let report = json!({
        "der_bytes": envelope.to_der().len(),
        "elements": fields,
    });

    serde_json::to_string_pretty(&report)
        .map_err(|e| RegSealError::CommandFailed(format!("cannot render JSON: {e}")))
}
