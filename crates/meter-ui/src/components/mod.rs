pub mod metric_card;
pub mod nav;
pub mod revenue_display;
pub mod toast;
pub mod usage_component_form;
