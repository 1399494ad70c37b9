use crate::cli::ui;
use crate::rate_provider::RateSnapshot;
use comfy_table::Cell;

/// Full names for the commonly displayed currencies. Codes outside this
/// list render as the bare code.
fn currency_name(code: &str) -> String {
    let name = match code {
        "EUR" => "Euro",
        "GBP" => "British Pound",
        "JPY" => "Japanese Yen",
        "CHF" => "Swiss Franc",
        "CAD" => "Canadian Dollar",
        "AUD" => "Australian Dollar",
        "CNY" => "Chinese Yuan",
        "TRY" => "Turkish Lira",
        "INR" => "Indian Rupee",
        "BRL" => "Brazilian Real",
        "MXN" => "Mexican Peso",
        "ZAR" => "South African Rand",
        "USD" => "US Dollar",
        _ => return code.to_string(),
    };
    format!("{name} ({code})")
}

fn format_rate(rate: f64) -> String {
    if rate > 100.0 {
        ui::format_grouped(rate, 2)
    } else {
        format!("{rate:.4}")
    }
}

/// Renders a snapshot as a styled table, restricted to the configured
/// display currencies that are present in the snapshot.
pub fn render_snapshot(snapshot: &RateSnapshot, display_currencies: &[String]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Rate (1 {})", snapshot.base)),
    ]);

    for code in display_currencies {
        if let Some(rate) = snapshot.rates.get(code) {
            table.add_row(vec![
                Cell::new(currency_name(code)),
                ui::value_cell(&format_rate(*rate)),
            ]);
        }
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text(
            &format!("Exchange Rates | Base: {}", snapshot.base),
            ui::StyleType::Title
        )
    );
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n{}",
        ui::style_text(
            &format!(
                "Provider date: {} | Retrieved: {}",
                snapshot.date,
                snapshot.retrieved_at.format("%Y-%m-%d %H:%M:%S")
            ),
            ui::StyleType::Subtle
        )
    ));

    output
}
