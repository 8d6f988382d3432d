//! Colored terminal output helpers.
//!
//! Status lines go to stderr so stdout carries only command results
//! (envelopes, plaintext, completion scripts) and can be piped.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::protocol::Envelope;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    eprintln!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    eprintln!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of envelope parts (Field, Bytes) in wire order.
pub fn print_envelope_table(envelope: &Envelope) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Field", "Bytes"]);

    for (index, (name, bytes)) in envelope_fields(envelope).iter().enumerate() {
        table.add_row(vec![
            index.to_string(),
            (*name).to_string(),
            bytes.len().to_string(),
        ]);
    }

    println!("{table}");
}

/// Envelope parts paired with their display names, in wire order.
pub fn envelope_fields(envelope: &Envelope) -> [(&'static str, &[u8]); 4] {
    [
        ("encrypted_key", envelope.encrypted_key.as_slice()),
        ("encrypted_iv", envelope.encrypted_iv.as_slice()),
        ("signature", envelope.signature.as_slice()),
        ("ciphertext", envelope.ciphertext.as_slice()),
    ]
}
