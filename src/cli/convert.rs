use crate::cli::ui;

/// Renders a conversion result, e.g. `100.00 USD = 92.00 EUR`.
pub fn render_conversion(amount: f64, from: &str, converted: f64, to: &str) -> String {
    ui::style_text(
        &format!(
            "{} {from} = {} {to}",
            ui::format_grouped(amount, 2),
            ui::format_grouped(converted, 2)
        ),
        ui::StyleType::Success,
    )
}
