//! Class → order → family → genus → species tree built from species lists.
//!
//! Every level keeps its children in first-insertion order, so serializing a
//! tree built from an eBird species list preserves the list's taxonomic order.

use serde::Serialize;

use crate::model::Species;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxonomicClass {
    pub class_name: String,
    pub orders: Vec<TaxonomicOrder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxonomicOrder {
    pub order_name: String,
    pub families: Vec<TaxonomicFamily>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxonomicFamily {
    pub family_name: String,
    pub genera: Vec<TaxonomicGenus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxonomicGenus {
    pub generic_name: String,
    pub species: Vec<TaxonomicSpecies>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxonomicSpecies {
    pub specific_name: String,
}

/// Find the child named `name`, appending a fresh one if absent.
fn child<'a, T>(items: &'a mut Vec<T>, name: &str, key: impl Fn(&T) -> &str, make: impl FnOnce() -> T) -> &'a mut T {
    let idx = match items.iter().position(|item| key(item) == name) {
        Some(idx) => idx,
        None => {
            items.push(make());
            items.len() - 1
        }
    };
    &mut items[idx]
}

impl TaxonomicClass {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self { class_name: class_name.into(), orders: Vec::new() }
    }

    /// Birds.
    pub fn aves() -> Self {
        Self::new("Aves")
    }

    pub fn insert_species(&mut self, s: &Species) {
        let order = child(&mut self.orders, &s.order, |o| o.order_name.as_str(), || TaxonomicOrder {
            order_name: s.order.clone(),
            families: Vec::new(),
        });
        let family = child(&mut order.families, &s.family, |f| f.family_name.as_str(), || TaxonomicFamily {
            family_name: s.family.clone(),
            genera: Vec::new(),
        });
        let genus = child(&mut family.genera, &s.generic_name, |g| g.generic_name.as_str(), || TaxonomicGenus {
            generic_name: s.generic_name.clone(),
            species: Vec::new(),
        });
        child(&mut genus.species, &s.specific_name, |sp| sp.specific_name.as_str(), || TaxonomicSpecies {
            specific_name: s.specific_name.clone(),
        });
    }

    pub fn species_count(&self) -> usize {
        self.orders
            .iter()
            .flat_map(|o| &o.families)
            .flat_map(|f| &f.genera)
            .map(|g| g.species.len())
            .sum()
    }
}

impl<'a> FromIterator<&'a Species> for TaxonomicClass {
    fn from_iter<I: IntoIterator<Item = &'a Species>>(iter: I) -> Self {
        let mut class = TaxonomicClass::aves();
        for s in iter {
            class.insert_species(s);
        }
        class
    }
}
