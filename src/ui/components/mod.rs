pub mod history_table;
pub mod kpi_card;
pub mod notice;
pub mod pie_chart;
pub mod result_panel;
