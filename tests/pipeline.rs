use indoc::indoc;
use recipe_finder::{
    client::FakeTransport, error::Stage, render, Config, PricePerServing, Query, RecipeError,
    RecipeFinder,
};

const SEARCH: &str = "/recipes/complexSearch";
const INFO: &str = "/recipes/715538/information";

const SEARCH_BODY: &str = r#"{"results": [{"id": 715538, "title": "pasta"}], "totalResults": 1}"#;

const INFO_BODY: &str = indoc! {r#"
    {
        "id": 715538,
        "title": "what to make for dinner tonight?? bruschetta style pork & pasta",
        "image": "https://img.spoonacular.com/recipes/715538-556x370.jpg",
        "servings": 5,
        "readyInMinutes": 35,
        "pricePerServing": 150,
        "vegetarian": false,
        "dairyFree": true,
        "veryHealthy": true,
        "summary": "A <b>hearty</b> dinner.",
        "instructions": "1. Boil the pasta. 2. Brown the pork. 3. Toss everything together.",
        "extendedIngredients": [
            { "name": "penne", "amount": 2.5, "unit": "cups" },
            { "name": "pork chops", "amount": 1, "unit": "lb" },
            { "name": "salt", "unit": "" }
        ],
        "nutrition": {
            "nutrients": [
                { "name": "Calories", "amount": 521.0, "unit": "kcal" },
                { "name": "Protein", "amount": 32.1, "unit": "g" },
                { "name": "Carbohydrates", "amount": 60.0, "unit": "g" },
                { "name": "Fat", "amount": 15.5, "unit": "g" }
            ]
        }
    }
"#};

fn finder(transport: FakeTransport) -> RecipeFinder<FakeTransport> {
    RecipeFinder::with_transport(transport, &Config::new("secret"))
}

fn ok_transport() -> FakeTransport {
    FakeTransport::new()
        .with_json(SEARCH, SEARCH_BODY)
        .with_json(INFO, INFO_BODY)
}

#[test]
fn search_then_fetch() {
    let finder = finder(ok_transport());
    let recipe = finder.find(&Query::new("pasta", 2).unwrap()).unwrap();
    assert_eq!(recipe.id, Some(715538));

    let requests = finder.client().transport().requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path(), SEARCH);
    assert!(requests[0]
        .query_pairs()
        .any(|(k, v)| k == "query" && v == "pasta"));
    assert_eq!(requests[1].path(), INFO);
    assert!(requests[1]
        .query_pairs()
        .any(|(k, v)| k == "includeNutrition" && v == "true"));
    assert!(requests
        .iter()
        .all(|u| u.query_pairs().any(|(k, v)| k == "apiKey" && v == "secret")));
}

#[test]
fn empty_search_stops_after_one_request() {
    let finder = finder(
        FakeTransport::new()
            .with_json(SEARCH, r#"{"results": [], "totalResults": 0}"#)
            .with_json(INFO, INFO_BODY),
    );
    let err = finder
        .find(&Query::new("unobtainium stew", 1).unwrap())
        .unwrap_err();

    assert!(err.is_user_correctable());
    assert_eq!(
        err.to_string(),
        "No recipe found for 'unobtainium stew'. Try another dish name!"
    );
    assert_eq!(finder.client().transport().requests().len(), 1);
}

#[test]
fn null_results_are_not_found() {
    let finder = finder(FakeTransport::new().with_json(SEARCH, r#"{"results": null}"#));
    let err = finder.find(&Query::new("pasta", 1).unwrap()).unwrap_err();
    assert!(matches!(err, RecipeError::NotFound { ref query } if query == "pasta"));
    assert_eq!(finder.client().transport().requests().len(), 1);
}

#[test]
fn rejected_key() {
    let finder = finder(FakeTransport::new().with_status(
        SEARCH,
        401,
        r#"{"status":"failure","code":401,"message":"You are not authorized."}"#,
    ));
    let err = finder.find(&Query::new("pasta", 1).unwrap()).unwrap_err();
    match &err {
        RecipeError::Api {
            stage,
            status,
            body,
        } => {
            assert_eq!(*stage, Stage::Search);
            assert_eq!(*status, 401);
            assert!(body.contains("not authorized"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().starts_with("Search API error: 401 - "));
    assert_eq!(finder.client().transport().requests().len(), 1);
}

#[test]
fn info_failure_after_search() {
    let finder = finder(
        FakeTransport::new()
            .with_json(SEARCH, SEARCH_BODY)
            .with_status(INFO, 402, "daily quota used"),
    );
    let err = finder.find(&Query::new("pasta", 1).unwrap()).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Info));
    assert_eq!(err.to_string(), "Recipe Info API error: 402 - daily quota used");
}

#[test]
fn unreachable_api() {
    let finder = finder(FakeTransport::new().with_unreachable(SEARCH, "connection refused"));
    let err = finder.find(&Query::new("pasta", 1).unwrap()).unwrap_err();
    assert!(err.is_transient());
    assert_eq!(err.to_string(), "Network error: connection refused");

    let mut out = Vec::new();
    render::write_error(&err, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("connection refused"));
}

#[test]
fn price_in_both_currencies() {
    let finder = finder(ok_transport());
    let recipe = finder.find(&Query::new("pasta", 1).unwrap()).unwrap();
    let price = PricePerServing::from_cents(recipe.price_per_serving, finder.currency()).unwrap();
    assert_eq!(price.primary_display(finder.currency()), "$1.50");
    assert_eq!(price.secondary_display(finder.currency()), "approx Rs. 210");
}

#[test]
fn rendered_recipe() {
    let finder = finder(ok_transport());
    let query = Query::new("pasta", 10).unwrap();
    let recipe = finder.find(&query).unwrap();
    let scaled = recipe.scale_to_servings(query.desired_servings());

    let mut out = Vec::new();
    render::write_recipe(&scaled, finder.currency(), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    let expected_in_order = [
        "What To Make For Dinner Tonight?? Bruschetta Style Pork & Pasta",
        "https://img.spoonacular.com/recipes/715538-556x370.jpg",
        "A hearty dinner.",
        "Dairy-Free",
        "Very Healthy",
        "Servings: 10",
        "Ready In: 35 min",
        "Price/Serving: $1.50 (approx Rs. 210)",
        "Scaled from 5 → 10 serving(s)",
        "- Penne — 5 cups",
        "- Pork chops — 2 lb",
        "- Salt — N/A",
        "Step 1. Boil the pasta.",
        "Step 2. Brown the pork.",
        "Step 3. Toss everything together.",
        "Nutrition scaled for 10 serving(s)",
        "Calories: 1042",
        "Protein: 64.2 g",
        "Carbs: 120 g",
        "Fat: 31 g",
        "Sugar: N/A",
        "Fiber: N/A",
    ];
    let mut rest = text.as_str();
    for expected in expected_in_order {
        let at = rest
            .find(expected)
            .unwrap_or_else(|| panic!("missing {expected:?} in:\n{text}"));
        rest = &rest[at + expected.len()..];
    }
    assert!(!text.contains("Vegetarian"));
    assert!(!text.contains("<b>"));
}

#[test]
fn same_finder_serves_many_queries() {
    let finder = finder(ok_transport());
    for servings in [1, 5, 50] {
        let recipe = finder.find(&Query::new("pasta", servings).unwrap()).unwrap();
        let scaled = recipe.scale_to_servings(servings);
        assert_eq!(scaled.target.desired(), servings);
    }
    assert_eq!(finder.client().transport().requests().len(), 6);
}
