//! Ordered template storage

use crate::{Template, TemplateId};

/// An ordered list of templates with index and id lookup.
///
/// Ids are unique: inserting a template whose id is already present replaces
/// the previous entry.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    name: String,
    templates: Vec<Template>,
}

impl TemplateCatalog {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            templates: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a template, returning the entry it replaced if the id was taken.
    pub fn insert(&mut self, template: Template) -> Option<Template> {
        let previous = self.remove(template.id());
        self.templates.push(template);
        previous
    }

    /// Remove the template with the given id.
    pub fn remove(&mut self, id: TemplateId) -> Option<Template> {
        let index = self.position(id)?;
        Some(self.templates.remove(index))
    }

    /// Index of the template with the given id.
    pub fn position(&self, id: TemplateId) -> Option<usize> {
        self.templates.iter().position(|t| t.id() == id)
    }

    pub fn find(&self, id: TemplateId) -> Option<&Template> {
        self.templates.iter().find(|t| t.id() == id)
    }

    pub fn get(&self, index: usize) -> Option<&Template> {
        self.templates.get(index)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Template> {
        self.templates.iter()
    }

    /// Stable sort, smallest area first.
    pub fn sort_by_area(&mut self) {
        self.templates.sort_by_key(|t| t.area());
    }

    /// Increment the usage of every template sharing `source_id`.
    /// Returns how many templates were updated.
    pub fn record_usage(&mut self, source_id: TemplateId) -> usize {
        let mut count = 0;
        for template in self.templates.iter_mut().filter(|t| t.source_id() == source_id) {
            template.record_usage();
            count += 1;
        }
        count
    }
}

impl<'a> IntoIterator for &'a TemplateCatalog {
    type Item = &'a Template;
    type IntoIter = std::slice::Iter<'a, Template>;

    fn into_iter(self) -> Self::IntoIter {
        self.templates.iter()
    }
}

impl Extend<Template> for TemplateCatalog {
    fn extend<I: IntoIterator<Item = Template>>(&mut self, iter: I) {
        for template in iter {
            self.insert(template);
        }
    }
}
