use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub card_fill: String,
    pub card_border: String,
    pub card_text_color: String,
    pub line_color: String,
    pub partnership_color: String,
    pub background: String,
}

impl Theme {
    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            card_fill: "#FFFFFF".to_string(),
            card_border: "#E5E7EB".to_string(),
            card_text_color: "#1C2430".to_string(),
            line_color: "#D1D5DB".to_string(),
            partnership_color: "#9CA3AF".to_string(),
            background: "#F9FAFB".to_string(),
        }
    }

    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 14.0,
            card_fill: "#ECECFF".to_string(),
            card_border: "#9370DB".to_string(),
            card_text_color: "#333333".to_string(),
            line_color: "#333333".to_string(),
            partnership_color: "#666666".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::modern()
    }
}
