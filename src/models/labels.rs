/// Index-aligned label tables for the classifier.
///
/// The display table holds human-readable breed names; the API table holds
/// the names the image source understands. Both come from single-line CSV
/// files and must have the same length as the model's output vector.
#[derive(Debug, Clone)]
pub struct LabelTables {
    display: Vec<String>,
    api: Vec<String>,
}

impl LabelTables {
    pub fn new(display: Vec<String>, api: Vec<String>) -> Result<Self, LabelTableError> {
        if display.len() != api.len() {
            return Err(LabelTableError::TableLengthMismatch {
                display: display.len(),
                api: api.len(),
            });
        }
        Ok(Self { display, api })
    }

    /// Parse both tables from single CSV lines (the label files contain one
    /// comma-separated line each).
    pub fn from_csv_lines(display_line: &str, api_line: &str) -> Result<Self, LabelTableError> {
        Self::new(parse_csv_line(display_line), parse_csv_line(api_line))
    }

    pub fn len(&self) -> usize {
        self.display.len()
    }

    pub fn is_empty(&self) -> bool {
        self.display.is_empty()
    }

    /// (display label, API label) at the given model output index.
    pub fn get(&self, index: usize) -> Option<(&str, &str)> {
        Some((self.display.get(index)?, self.api.get(index)?))
    }
}

fn parse_csv_line(line: &str) -> Vec<String> {
    if line.trim().is_empty() {
        return Vec::new();
    }
    line.split(',').map(|label| label.trim().to_string()).collect()
}

#[derive(Debug, thiserror::Error)]
pub enum LabelTableError {
    #[error("label tables are not index-aligned: {display} display labels vs {api} API labels")]
    TableLengthMismatch { display: usize, api: usize },
}
