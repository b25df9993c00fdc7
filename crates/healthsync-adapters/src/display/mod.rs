mod tracing_display;

pub use tracing_display::TracingDisplay;
