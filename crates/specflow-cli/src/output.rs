use serde::Serialize;
use serde_json::Value;

/// Compact single-line JSON, easy for an orchestrating agent to parse.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_row.join("  "));

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }
}

/// Print a flat key/value result: JSON object with `--json`, otherwise a
/// KEY/VALUE table.
pub fn print_result<T: Serialize>(value: &T, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(value);
    }
    let Value::Object(map) = serde_json::to_value(value)? else {
        anyhow::bail!("result is not a key/value set");
    };
    let rows = map
        .into_iter()
        .map(|(key, value)| vec![key, display_value(&value)])
        .collect();
    print_table(&["KEY", "VALUE"], rows);
    Ok(())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
