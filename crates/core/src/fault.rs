//! Fault injection for the QA crash path.
//!
//! Exactly one catalog record is designated at build time. Front-ends that
//! render it must fail with [`RecipeError::SimulatedFault`] before showing any
//! recipe content.

use crate::catalog::Catalog;
use crate::error::RecipeError;
use crate::types::Recipe;

/// Returns `true` when `recipe` is the catalog's designated fault recipe.
pub fn is_fault_recipe(catalog: &Catalog, recipe: &Recipe) -> bool {
    catalog.fault_recipe_id() == Some(recipe.id)
}

/// Fails with the simulated fault when `recipe` is the designated record.
pub fn ensure_renderable(catalog: &Catalog, recipe: &Recipe) -> Result<(), RecipeError> {
    if is_fault_recipe(catalog, recipe) {
        return Err(RecipeError::SimulatedFault {
            recipe_id: recipe.id,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SIMULATED_FAULT_MESSAGE;

    #[test]
    fn exactly_one_recipe_is_flagged() {
        let catalog = Catalog::sample();
        let flagged: Vec<_> = catalog
            .recipes()
            .iter()
            .filter(|recipe| is_fault_recipe(&catalog, recipe))
            .collect();
        assert_eq!(flagged.len(), 1);
        assert_eq!(
            flagged[0].id,
            catalog.recipes().last().expect("non-empty").id
        );
    }

    #[test]
    fn flagged_recipe_cannot_render() {
        let catalog = Catalog::sample();
        let last = catalog.recipes().last().expect("non-empty");
        let err = ensure_renderable(&catalog, last).expect_err("fault recipe");
        assert_eq!(err.to_string(), SIMULATED_FAULT_MESSAGE);

        let first = &catalog.recipes()[0];
        assert!(ensure_renderable(&catalog, first).is_ok());
    }

    #[test]
    fn designation_is_per_catalog() {
        let sample = Catalog::sample();
        let subset = Catalog::new(sample.recipes()[..3].to_vec()).expect("unique ids");
        assert!(is_fault_recipe(&subset, &sample.recipes()[2]));
        assert!(!is_fault_recipe(&sample, &sample.recipes()[2]));
    }
}
