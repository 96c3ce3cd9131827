/// Accumulates text fragments and yields only complete lines.
///
/// The trailing segment after the last newline is retained as the carry
/// buffer for the next push, so lines split across fragment boundaries are
/// reassembled exactly once.
#[derive(Debug, Default)]
pub struct LineBuffer {
    carry: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `fragment` and returns every line completed by it.
    ///
    /// The last split segment (possibly empty) becomes the new carry.
    pub fn push(&mut self, fragment: &str) -> Vec<String> {
        self.carry.push_str(fragment);
        if !self.carry.contains('\n') {
            return Vec::new();
        }

        let buffered = std::mem::take(&mut self.carry);
        let mut segments: Vec<&str> = buffered.split('\n').collect();
        // split always yields at least one segment when the input had a '\n'
        self.carry = segments.pop().unwrap_or_default().to_string();
        segments.into_iter().map(str::to_string).collect()
    }

    /// Returns the remaining carry as a final line, if non-empty.
    ///
    /// Called once at end-of-stream; recovers data sent without a trailing
    /// newline.
    pub fn drain(&mut self) -> Option<String> {
        if self.carry.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.carry))
        }
    }
}
