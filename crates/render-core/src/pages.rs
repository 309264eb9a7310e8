use crate::error::RenderError;

/// Append-only page storage with a current-page selector, shared by canvas
/// implementations.
#[derive(Debug, Clone)]
pub struct PageSet<T> {
    pages: Vec<T>,
    current: Option<usize>,
}

impl<T> Default for PageSet<T> {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            current: None,
        }
    }
}

impl<T> PageSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `page` and selects it.
    pub fn push(&mut self, page: T) {
        self.pages.push(page);
        self.current = Some(self.pages.len() - 1);
    }

    pub fn select(&mut self, index: usize) -> Result<(), RenderError> {
        if index >= self.pages.len() {
            return Err(RenderError::PageOutOfRange {
                index,
                count: self.pages.len(),
            });
        }
        self.current = Some(index);
        Ok(())
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_mut(&mut self) -> Result<&mut T, RenderError> {
        let index = self.current.ok_or(RenderError::NoPage)?;
        self.pages.get_mut(index).ok_or(RenderError::NoPage)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.pages.iter()
    }

    pub fn into_pages(self) -> Vec<T> {
        self.pages
    }
}
