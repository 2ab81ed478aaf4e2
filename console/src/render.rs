//! Text rendering of the console screens.
//!
//! Every function returns the text instead of printing it.

use colored::*;
use common::kpis::SedeSummary;
use common::types::dtos::{
    InventoryItemDTO, KpiReport, OrderStatusDTO, ProductDTO, StockLevel, WorkerDTO,
};
use common::types::order_status::{StatusBucket, StatusStyle, normalize};
use common::utils::format_sede_name;
use common::views::{OrderView, StatusBucketKey, WorkflowAction};
use std::collections::BTreeMap;

const PROGRESS_CELLS: usize = 10;

/// Bucket label on its background color.
pub fn status_badge(style: &StatusStyle) -> String {
    let (r, g, b) = style.rgb();
    let label = format!(" {:<11}", style.bucket.label());
    let badge = label.on_truecolor(r, g, b).bold();
    if style.text == "text-white" {
        badge.white().to_string()
    } else {
        badge.black().to_string()
    }
}

pub fn progress_bar(progress: u8) -> String {
    let filled = usize::from(progress.min(100)) * PROGRESS_CELLS / 100;
    format!(
        "{}{} {:>3}%",
        "█".repeat(filled),
        "░".repeat(PROGRESS_CELLS - filled),
        progress
    )
}

fn money(amount: f64) -> String {
    format!("S/ {:.2}", amount)
}

pub fn order_row(view: &OrderView, actions: &[WorkflowAction]) -> String {
    let mut row = format!(
        "{:<12} {} {} {} {:>10}  chef: {:<14} moto: {:<14}",
        view.id,
        status_badge(&view.style),
        progress_bar(view.progress),
        view.elapsed,
        money(view.amount),
        view.chef.as_deref().unwrap_or("-"),
        view.rider.as_deref().unwrap_or("-"),
    );
    if view.bucket() == StatusBucket::Unknown && !view.raw_status.is_empty() {
        row.push_str(&format!(" ({})", view.raw_status).dimmed().to_string());
    }
    if !actions.is_empty() {
        let hints: Vec<&str> = actions.iter().map(|action| action.label()).collect();
        row.push_str(&format!("  → {}", hints.join(" | ")).cyan().to_string());
    }
    row
}

/// Header, one row per order and the per-status totals.
pub fn orders_table(
    sede: &str,
    rows: &[(OrderView, Vec<WorkflowAction>)],
    counts: &BTreeMap<StatusBucketKey, usize>,
) -> String {
    let mut lines = vec![
        format!("Pedidos · {} ({})", format_sede_name(sede), rows.len())
            .bold()
            .to_string(),
    ];
    if rows.is_empty() {
        lines.push("No hay pedidos.".dimmed().to_string());
    }
    for (view, actions) in rows {
        lines.push(order_row(view, actions));
        for item in &view.items {
            lines.push(format!("             · {}", item).dimmed().to_string());
        }
    }
    if !counts.is_empty() {
        let totals: Vec<String> = counts
            .iter()
            .map(|(key, count)| format!("{}: {}", key.0.label(), count))
            .collect();
        lines.push(totals.join("  "));
    }
    lines.join("\n")
}

pub fn workers_list(chefs: &[&WorkerDTO], riders: &[&WorkerDTO]) -> String {
    let mut lines = Vec::new();
    for (title, workers) in [("Chefs", chefs), ("Motorizados", riders)] {
        lines.push(format!("{} ({})", title, workers.len()).bold().to_string());
        if workers.is_empty() {
            lines.push("  ninguno disponible".dimmed().to_string());
        }
        for worker in workers {
            lines.push(format!("  {:<20} {}", worker.display_name(), worker.email));
        }
    }
    lines.join("\n")
}

/// Status transitions, oldest first, each colored by its new status.
pub fn history_lines(status: &OrderStatusDTO) -> String {
    let pedido = status.pedido_id.as_deref().unwrap_or("?");
    let current = normalize(status.estado.as_deref());
    let mut lines = vec![format!(
        "Historial de {} · estado actual {}",
        pedido,
        status_badge(&current)
    )];
    if status.historial.is_empty() {
        lines.push("  sin transiciones registradas".dimmed().to_string());
    }
    for entry in &status.historial {
        let from = entry
            .estado_anterior
            .as_deref()
            .map(|raw| normalize(Some(raw)).bucket.label())
            .unwrap_or("Inicio");
        let to = normalize(entry.estado_nuevo.as_deref());
        let mut line = format!(
            "  {:<20} {:<11} → {}",
            entry.timestamp.as_deref().unwrap_or("-"),
            from,
            status_badge(&to)
        );
        if let Some(motivo) = entry.motivo.as_deref().filter(|m| !m.is_empty()) {
            line.push_str(&format!("  {}", motivo));
        }
        lines.push(line);
    }
    lines.join("\n")
}

pub fn stock_badge(level: StockLevel) -> String {
    let label = format!(" {:<10}", level.label());
    match level {
        StockLevel::OutOfStock => label.on_red().white().bold().to_string(),
        StockLevel::Low => label.on_yellow().black().bold().to_string(),
        StockLevel::InStock => label.on_green().white().bold().to_string(),
    }
}

pub fn products_table(products: &[ProductDTO], has_more: bool) -> String {
    let mut lines = vec![format!("Productos ({})", products.len()).bold().to_string()];
    if products.is_empty() {
        lines.push("No hay productos.".dimmed().to_string());
    }
    for product in products {
        let mut line = format!(
            "  {:<10} {:<28} {:<8} {:>10}",
            product.producto_id,
            product.nombre_producto,
            product.tipo.as_deref().unwrap_or("-"),
            money(product.price()),
        );
        if !product.is_active() {
            line = format!("{} inactivo", line).dimmed().to_string();
        }
        lines.push(line);
    }
    if has_more {
        lines.push("  ... hay más productos".dimmed().to_string());
    }
    lines.join("\n")
}

/// One row per product, out-of-stock first.
pub fn inventory_table(items: &[InventoryItemDTO]) -> String {
    let mut sorted: Vec<&InventoryItemDTO> = items.iter().collect();
    sorted.sort_by_key(|item| match item.stock_level() {
        StockLevel::OutOfStock => 0,
        StockLevel::Low => 1,
        StockLevel::InStock => 2,
    });

    let mut lines = vec![format!("Inventario ({})", items.len()).bold().to_string()];
    if items.is_empty() {
        lines.push("Sin registros de inventario.".dimmed().to_string());
    }
    for item in sorted {
        lines.push(format!(
            "  {:<10} {:<28} {} {:>5} (min {}, max {})",
            item.producto_id,
            item.nombre_producto.as_deref().unwrap_or("-"),
            stock_badge(item.stock_level()),
            item.stock_actual,
            item.stock_minimo,
            item.stock_maximo,
        ));
    }
    lines.join("\n")
}

pub fn kpi_report(report: &KpiReport, summary: &SedeSummary) -> String {
    let title = match report.fecha.as_deref() {
        Some(fecha) => format!("KPIs · {} · {}", format_sede_name(&report.tenant_id), fecha),
        None => format!("KPIs · {}", format_sede_name(&report.tenant_id)),
    };
    let mut lines = vec![
        title.bold().to_string(),
        format!("  Pedidos:          {}", report.numero_pedidos),
        format!("  Ingresos:         {}", money(report.ingresos_dia)),
        format!("  Ticket promedio:  {}", money(report.ticket_promedio)),
        format!("  Tasa de éxito:    {:.1}%", report.tasa_exito),
    ];
    if !report.top_productos.is_empty() {
        lines.push("  Top productos:".to_string());
        for product in &report.top_productos {
            lines.push(format!("    {:<24} {}", product.nombre, product.ventas));
        }
    }
    lines.push("En pantalla".bold().to_string());
    lines.push(format!(
        "  {} pedidos · {} · ticket {} · tiempo promedio {} · éxito {:.1}%",
        summary.orders,
        money(summary.revenue),
        money(summary.average_ticket),
        summary.average_elapsed,
        summary.success_rate
    ));
    lines.join("\n")
}
