mod renderer;

pub use renderer::{
    format_survey_date, highlight_swatch, primary_swatch, render_detail, Badge, ColorSwatch,
    DetailView, Swatch,
};
