use crate::mark_files::MarkFile;

/// Picks a mark file either by its 1-based position in a listing or by its file name.
#[derive(Debug, Clone)]
pub struct MarkFileSelector {
    selector: String,
}

impl MarkFileSelector {
    pub fn new(selector: String) -> Self {
        Self {
            selector: selector.trim().to_owned(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.selector
    }

    pub fn select_from<'a>(&self, files: &'a [MarkFile]) -> Option<&'a MarkFile> {
        self.select_as_number(files)
            .or_else(|| self.select_as_name(files))
    }

    fn select_as_number<'a>(&self, files: &'a [MarkFile]) -> Option<&'a MarkFile> {
        let number = self.selector.parse::<usize>().ok()?;
        files.get(number.checked_sub(1)?)
    }

    fn select_as_name<'a>(&self, files: &'a [MarkFile]) -> Option<&'a MarkFile> {
        files.iter().find(|file| file.name() == self.selector)
    }
}
