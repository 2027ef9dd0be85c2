//! Named show/store surface of one supply.

use crate::accessor::PropertyAccessor;
use crate::error::AccessError;
use crate::registry::{PropertyDescriptor, Registry};
use crate::supply::PowerSupply;
use crate::visibility::{self, Mode};

/// A visible attribute and its access mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'r> {
    pub descriptor: &'r PropertyDescriptor,
    pub mode: Mode,
}

pub struct AttributeSet<'a, S: ?Sized> {
    accessor: PropertyAccessor<'a>,
    supply: &'a S,
}

impl<'a, S> AttributeSet<'a, S>
where
    S: PowerSupply + ?Sized,
{
    pub fn new(registry: &'a Registry, supply: &'a S) -> Self {
        Self {
            accessor: PropertyAccessor::new(registry),
            supply,
        }
    }

    /// Visible attributes in registry order.
    pub fn attributes(&self) -> Vec<Attribute<'a>> {
        self.accessor
            .registry()
            .iter()
            .map(|descriptor| Attribute {
                descriptor,
                mode: visibility::resolve(self.supply, descriptor),
            })
            .filter(|attr| attr.mode.is_visible())
            .collect()
    }

    pub fn mode(&self, name: &str) -> Mode {
        self.accessor
            .registry()
            .lookup(name)
            .map_or(Mode::Hidden, |d| visibility::resolve(self.supply, d))
    }

    pub fn show(&self, name: &str) -> Result<String, AccessError> {
        let attr = self.visible(name)?;
        self.accessor.read(self.supply, attr.descriptor.id)
    }

    /// Returns the number of bytes consumed, which is all of `text`.
    pub fn store(&self, name: &str, text: &str) -> Result<usize, AccessError> {
        let attr = self.visible(name)?;
        if !attr.mode.is_writable() {
            return Err(AccessError::ReadOnly(name.to_string()));
        }
        self.accessor
            .write(self.supply, attr.descriptor.id, text)?;
        Ok(text.len())
    }

    fn visible(&self, name: &str) -> Result<Attribute<'a>, AccessError> {
        let descriptor = self
            .accessor
            .registry()
            .lookup(name)
            .ok_or_else(|| AccessError::UnknownAttribute(name.to_string()))?;
        let mode = visibility::resolve(self.supply, descriptor);
        if !mode.is_visible() {
            return Err(AccessError::UnknownAttribute(name.to_string()));
        }
        Ok(Attribute { descriptor, mode })
    }
}
