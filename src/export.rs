// 📤 CSV Export - write clients back out with the sheet's own headers
//
// Output is standard CSV (embedded quotes doubled), so it reads back with
// QuoteMode::Doubled without loss.

use crate::entities::Client;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Write clients as CSV. Returns the number of data rows written.
pub fn write_clients<W: Write>(writer: W, clients: &[&Client]) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(Client::HEADERS)
        .context("Failed to write CSV header")?;

    for client in clients {
        wtr.write_record(client.to_row())
            .with_context(|| format!("Failed to write client {}", client.id))?;
    }

    wtr.flush().context("Failed to flush CSV output")?;
    Ok(clients.len())
}

pub fn export_clients(path: &Path, clients: &[&Client]) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_clients(file, clients)
}
