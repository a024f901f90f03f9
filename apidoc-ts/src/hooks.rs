//! `parser-find-elements` extension point.
//!
//! Handlers run in ascending priority each time the block parser appends an
//! element, and may rewrite the element list in place.

use crate::context::Context;
use crate::model::Element;
use std::path::Path;
use thiserror::Error;

pub trait FindElements {
    /// `element` is the one just appended to `elements`; `block` is the raw
    /// comment text it came from.
    fn find_elements(
        &self,
        ctx: &mut Context,
        elements: &mut Vec<Element>,
        element: &Element,
        block: &str,
        filename: &Path,
    );
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HookError {
    #[error("a parser-find-elements handler is already registered at priority {0}")]
    PriorityTaken(u32),
}

#[derive(Default)]
pub struct Hooks {
    find_elements: Vec<(u32, Box<dyn FindElements>)>,
}

impl Hooks {
    pub fn add_find_elements(
        &mut self,
        priority: u32,
        handler: Box<dyn FindElements>,
    ) -> Result<(), HookError> {
        match self
            .find_elements
            .binary_search_by_key(&priority, |(p, _)| *p)
        {
            Ok(_) => Err(HookError::PriorityTaken(priority)),
            Err(pos) => {
                self.find_elements.insert(pos, (priority, handler));
                Ok(())
            }
        }
    }

    pub fn run_find_elements(
        &self,
        ctx: &mut Context,
        elements: &mut Vec<Element>,
        element: &Element,
        block: &str,
        filename: &Path,
    ) {
        for (_, handler) in &self.find_elements {
            handler.find_elements(ctx, elements, element, block, filename);
        }
    }

    pub fn priorities(&self) -> Vec<u32> {
        self.find_elements.iter().map(|(p, _)| *p).collect()
    }
}
