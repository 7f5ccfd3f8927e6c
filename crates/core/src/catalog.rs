use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock};

use thiserror::Error;
use tracing::{debug, warn};

use crate::error::RecipeError;
use crate::types::{Difficulty, Ingredient, Recipe, RecipeId};

static SAMPLE_CATALOG: LazyLock<Arc<Catalog>> = LazyLock::new(|| {
    let catalog = Catalog::build(sample_recipes());
    debug!(
        stage = "catalog",
        count = catalog.len(),
        fault_recipe = ?catalog.fault_recipe_id(),
        "sample catalog built"
    );
    Arc::new(catalog)
});

/// Errors raised while assembling a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("duplicate recipe id in catalog: {0}")]
    DuplicateId(RecipeId),
}

/// Ordered, immutable collection of every known recipe.
///
/// The fault recipe is the last record at construction time. The designation
/// is stored, so it does not depend on where that record sits afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    recipes: Vec<Recipe>,
    index: HashMap<RecipeId, usize>,
    fault_recipe_id: Option<RecipeId>,
}

impl Catalog {
    /// Builds a catalog from `recipes`, rejecting duplicate ids.
    pub fn new(recipes: Vec<Recipe>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(recipes.len());
        for recipe in &recipes {
            if !seen.insert(recipe.id) {
                return Err(CatalogError::DuplicateId(recipe.id));
            }
        }
        Ok(Self::build(recipes))
    }

    /// Returns the process-wide compiled-in catalog.
    pub fn sample() -> Arc<Catalog> {
        Arc::clone(&SAMPLE_CATALOG)
    }

    fn build(recipes: Vec<Recipe>) -> Self {
        let index = recipes
            .iter()
            .enumerate()
            .map(|(position, recipe)| (recipe.id, position))
            .collect();
        let fault_recipe_id = recipes.last().map(|recipe| recipe.id);
        Self {
            recipes,
            index,
            fault_recipe_id,
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Identifier of the record designated for fault injection.
    pub fn fault_recipe_id(&self) -> Option<RecipeId> {
        self.fault_recipe_id
    }

    /// Looks up a recipe, failing loudly when the id is unknown.
    pub fn get(&self, id: RecipeId) -> Result<&Recipe, RecipeError> {
        match self.index.get(&id) {
            Some(&position) => Ok(&self.recipes[position]),
            None => {
                warn!(stage = "catalog", recipe_id = %id, "recipe lookup missed");
                Err(RecipeError::RecipeNotFound(id))
            }
        }
    }
}

fn steps(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| line.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn recipe(
    title: &str,
    summary: &str,
    duration_minutes: u32,
    difficulty: Difficulty,
    image_name: Option<&str>,
    base_servings: i32,
    ingredients: Vec<Ingredient>,
    step_lines: &[&str],
) -> Recipe {
    Recipe {
        id: RecipeId::new(),
        title: title.to_string(),
        summary: summary.to_string(),
        duration_minutes,
        difficulty,
        image_name: image_name.map(str::to_string),
        base_servings,
        ingredients,
        steps: steps(step_lines),
    }
}

fn sample_recipes() -> Vec<Recipe> {
    vec![
        recipe(
            "Classic Margherita Pizza",
            "Crispy thin crust with fresh tomato sauce, mozzarella, and basil.",
            35,
            Difficulty::Medium,
            Some("margherita"),
            2,
            vec![
                Ingredient::new("pizza dough ball").quantity(1.0),
                Ingredient::new("tomato passata").unit("cup").quantity(0.5),
                Ingredient::new("fresh mozzarella").unit("g").quantity(120.0),
                Ingredient::new("fresh basil leaves"),
                Ingredient::new("olive oil").unit("tbsp").quantity(1.0),
                Ingredient::new("Pinch of salt"),
            ],
            &[
                "Preheat oven to 250ºC with a pizza stone if available.",
                "Stretch dough and spread tomato passata evenly.",
                "Top with torn mozzarella, drizzle oil, and season.",
                "Bake 8-10 minutes until crust is golden.",
                "Finish with fresh basil before serving.",
            ],
        ),
        recipe(
            "Creamy Mushroom Risotto",
            "Silky arborio rice slowly cooked with mushroom stock and parmesan.",
            45,
            Difficulty::Hard,
            Some("risotto"),
            4,
            vec![
                Ingredient::new("arborio rice").unit("cup").quantity(1.0),
                Ingredient::new("mixed mushrooms").unit("g").quantity(250.0),
                Ingredient::new("dry white wine").unit("cup").quantity(0.5),
                Ingredient::new("vegetable stock").unit("cup").quantity(4.0),
                Ingredient::new("butter").unit("tbsp").quantity(2.0),
                Ingredient::new("grated parmesan").unit("cup").quantity(0.33),
            ],
            &[
                "Sauté mushrooms in butter until browned; set aside.",
                "Toast rice in the same pan, then deglaze with wine.",
                "Add warm stock one ladle at a time, stirring often.",
                "Fold in mushrooms and parmesan once rice is al dente.",
                "Rest 2 minutes before serving creamy.",
            ],
        ),
        recipe(
            "Citrus Quinoa Salad",
            "Bright salad with fluffy quinoa, orange segments, and crunchy greens.",
            20,
            Difficulty::Easy,
            Some("quinoa"),
            2,
            vec![
                Ingredient::new("cooked quinoa").unit("cup").quantity(1.0),
                Ingredient::new("oranges, segmented").quantity(2.0),
                Ingredient::new("cucumber, diced").quantity(0.5),
                Ingredient::new("baby spinach (handful)"),
                Ingredient::new("toasted almonds").unit("tbsp").quantity(2.0),
                Ingredient::new("citrus vinaigrette"),
            ],
            &[
                "Fluff cold quinoa with a fork.",
                "Combine quinoa, oranges, cucumber, spinach, and almonds.",
                "Drizzle with vinaigrette and toss gently.",
                "Season with salt and serve immediately.",
            ],
        ),
        recipe(
            "Spicy Lentil Soup",
            "Comforting tomato-based soup with red lentils and warm spices.",
            30,
            Difficulty::Easy,
            Some("lentil_soup"),
            4,
            vec![
                Ingredient::new("red lentils").unit("cup").quantity(1.0),
                Ingredient::new("yellow onion, diced").quantity(1.0),
                Ingredient::new("garlic cloves").quantity(2.0),
                Ingredient::new("ground cumin").unit("tsp").quantity(1.0),
                Ingredient::new("smoked paprika").unit("tsp").quantity(1.0),
                Ingredient::new("vegetable broth").unit("cup").quantity(4.0),
            ],
            &[
                "Sauté onion and garlic until translucent.",
                "Add spices and cook until fragrant.",
                "Pour in lentils and broth, simmer 20 minutes.",
                "Blend partially for creamier texture and serve.",
            ],
        ),
        recipe(
            "Garlic Butter Shrimp Pasta",
            "Juicy shrimp tossed with linguine, garlic butter, and lemon.",
            25,
            Difficulty::Medium,
            Some("shrimp_pasta"),
            2,
            vec![
                Ingredient::new("linguine").unit("g").quantity(200.0),
                Ingredient::new("shrimp, peeled").unit("g").quantity(300.0),
                Ingredient::new("garlic cloves").quantity(3.0),
                Ingredient::new("butter").unit("tbsp").quantity(3.0),
                Ingredient::new("lemon, juiced").quantity(1.0),
                Ingredient::new("fresh parsley").unit("tbsp").quantity(2.0),
            ],
            &[
                "Cook pasta al dente and reserve a cup of water.",
                "Sear shrimp in butter and garlic until pink.",
                "Add lemon juice, pasta, and a splash of pasta water.",
                "Toss with parsley and serve hot.",
            ],
        ),
        recipe(
            "Thai Green Curry",
            "Aromatic coconut curry with vegetables and basil.",
            35,
            Difficulty::Medium,
            Some("green_curry"),
            4,
            vec![
                Ingredient::new("green curry paste").unit("tbsp").quantity(2.0),
                Ingredient::new("coconut milk").unit("ml").quantity(400.0),
                Ingredient::new("mixed vegetables").unit("cup").quantity(1.0),
                Ingredient::new("firm tofu or chicken").unit("g").quantity(250.0),
                Ingredient::new("fresh basil"),
                Ingredient::new("fish sauce").unit("tbsp").quantity(1.0),
            ],
            &[
                "Fry curry paste in coconut cream until fragrant.",
                "Add protein and vegetables, toss to coat.",
                "Pour remaining coconut milk and simmer 15 minutes.",
                "Finish with fish sauce and basil.",
            ],
        ),
        recipe(
            "Blueberry Overnight Oats",
            "Make-ahead breakfast with oats, chia, yogurt, and berries.",
            10,
            Difficulty::Easy,
            Some("overnight_oats"),
            1,
            vec![
                Ingredient::new("rolled oats").unit("cup").quantity(0.5),
                Ingredient::new("chia seeds").unit("tbsp").quantity(1.0),
                Ingredient::new("milk").unit("cup").quantity(0.5),
                Ingredient::new("yogurt").unit("cup").quantity(0.25),
                Ingredient::new("blueberries"),
                Ingredient::new("honey").unit("tsp").quantity(1.0),
            ],
            &[
                "Combine oats, chia, milk, yogurt, and honey.",
                "Stir in blueberries and refrigerate overnight.",
                "Top with extra fruit before serving.",
            ],
        ),
        recipe(
            "Herb Roasted Chicken",
            "Succulent roast chicken with crispy skin and fresh herbs.",
            70,
            Difficulty::Medium,
            Some("roast_chicken"),
            4,
            vec![
                Ingredient::new("whole chicken").quantity(1.0),
                Ingredient::new("butter").unit("tbsp").quantity(2.0),
                Ingredient::new("fresh thyme sprigs").quantity(4.0),
                Ingredient::new("fresh rosemary sprigs").quantity(2.0),
                Ingredient::new("garlic cloves").quantity(4.0),
                Ingredient::new("lemon").quantity(1.0),
            ],
            &[
                "Pat chicken dry and stuff with herbs and lemon.",
                "Rub butter and garlic under the skin.",
                "Roast at 200ºC for 60 minutes or until juices run clear.",
                "Rest 10 minutes before carving.",
            ],
        ),
        recipe(
            "Vegan Buddha Bowl",
            "Colorful bowl with roasted veggies, grains, and tahini drizzle.",
            30,
            Difficulty::Easy,
            Some("buddha_bowl"),
            2,
            vec![
                Ingredient::new("cooked brown rice").unit("cup").quantity(1.0),
                Ingredient::new("roasted sweet potato cubes").unit("cup").quantity(1.0),
                Ingredient::new("steamed broccoli florets").unit("cup").quantity(1.0),
                Ingredient::new("chickpeas").unit("cup").quantity(1.0),
                Ingredient::new("avocado").quantity(1.0),
                Ingredient::new("tahini dressing").unit("tbsp").quantity(3.0),
            ],
            &[
                "Arrange rice and vegetables in a shallow bowl.",
                "Add chickpeas and avocado.",
                "Drizzle with tahini dressing and serve.",
            ],
        ),
        recipe(
            "Chocolate Lava Cake",
            "Individual cakes with a gooey molten chocolate center.",
            25,
            Difficulty::Hard,
            Some("lava_cake"),
            4,
            vec![
                Ingredient::new("dark chocolate").unit("g").quantity(170.0),
                Ingredient::new("butter").unit("cup").quantity(0.5),
                Ingredient::new("eggs").quantity(2.0),
                Ingredient::new("egg yolks").quantity(2.0),
                Ingredient::new("sugar").unit("cup").quantity(0.33),
                Ingredient::new("flour").unit("cup").quantity(0.25),
                Ingredient::new("Pinch of salt"),
            ],
            &[
                "Melt chocolate and butter together.",
                "Whisk eggs and sugar until pale, fold into chocolate.",
                "Add flour and salt, then pour into buttered ramekins.",
                "Bake 12 minutes until edges set but center jiggles.",
            ],
        ),
        recipe(
            "Caprese Stuffed Avocado",
            "Ripe avocados filled with mozzarella, tomato, and pesto.",
            10,
            Difficulty::Easy,
            Some("caprese_avocado"),
            2,
            vec![
                Ingredient::new("ripe avocados").quantity(2.0),
                Ingredient::new("cherry tomatoes").quantity(10.0),
                Ingredient::new("mini mozzarella balls").quantity(8.0),
                Ingredient::new("fresh basil leaves"),
                Ingredient::new("pesto").unit("tbsp").quantity(1.0),
            ],
            &[
                "Halve avocados and remove pits.",
                "Toss tomatoes, mozzarella, basil, and pesto.",
                "Spoon mixture into avocado halves and serve.",
            ],
        ),
        recipe(
            "Smoky BBQ Jackfruit Sandwich",
            "Plant-based pulled “pork” with tangy slaw on toasted buns.",
            40,
            Difficulty::Medium,
            Some("bbq_jackfruit"),
            4,
            vec![
                Ingredient::new("young jackfruit cans").quantity(2.0),
                Ingredient::new("BBQ sauce").unit("cup").quantity(1.0),
                Ingredient::new("smoked paprika").unit("tsp").quantity(1.0),
                Ingredient::new("slaw mix").unit("cup").quantity(2.0),
                Ingredient::new("burger buns").quantity(4.0),
            ],
            &[
                "Rinse and shred jackfruit.",
                "Simmer with BBQ sauce and paprika for 20 minutes.",
                "Toast buns, pile jackfruit, and add slaw.",
            ],
        ),
        // Must stay last: the final record is the fault recipe.
        recipe(
            "Mystery Chef Special",
            "Experimental dish that keeps crashing the kitchen systems.",
            15,
            Difficulty::Hard,
            None,
            2,
            vec![Ingredient::new("???")],
            &["System error – steps failed to load."],
        ),
    ]
}
