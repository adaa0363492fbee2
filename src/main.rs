use log::debug;
use recipe_finder::presenter::{render_detail, render_error, render_favorites, render_list};
use recipe_finder::{
    FavoritesStorage, FinderConfig, RecipeApi, RecipeFinder, RecipeSummary, SearchOutcome,
};
use std::env;
use std::io::Write;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  <ingredients>   search, e.g. chicken, rice, tomatoes
  <n>             show details of result n
  s <n>           save or unsave result n
  o <n>           show the online page of result n
  f               list favorites
  n               start a new search
  q               quit";

#[derive(Debug, PartialEq)]
enum Command {
    Search(String),
    Details(usize),
    ToggleFavorite(usize),
    Open(usize),
    Favorites,
    NewSearch,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Command {
        let line = line.trim();
        match line {
            "q" | "quit" | "exit" => return Command::Quit,
            "f" | "favorites" => return Command::Favorites,
            "n" | "new" => return Command::NewSearch,
            "?" | "h" | "help" => return Command::Help,
            _ => {}
        }

        if let Ok(n) = line.parse::<usize>() {
            return Command::Details(n);
        }
        if let Some((cmd, arg)) = line.split_once(' ') {
            if let Ok(n) = arg.trim().parse::<usize>() {
                match cmd {
                    "s" | "save" => return Command::ToggleFavorite(n),
                    "o" | "open" => return Command::Open(n),
                    _ => {}
                }
            }
        }
        Command::Search(line.to_string())
    }
}

/// Result `n` of the current listing, counting from 1
fn pick(results: &[RecipeSummary], n: usize) -> Option<&RecipeSummary> {
    n.checked_sub(1).and_then(|idx| results.get(idx))
}

/// Run one search and render either the results or the error message
async fn search_once<A: RecipeApi, S: FavoritesStorage>(
    finder: &RecipeFinder<A, S>,
    input: &str,
) -> Result<String, String> {
    match finder.search(input).await.and_then(SearchOutcome::into_recipes) {
        Ok(recipes) => Ok(render_list(&recipes, |id| finder.is_favorite(id))),
        Err(e) => Err(render_error(&e)),
    }
}

fn prompt(has_results: bool) {
    if has_results {
        print!("\n[n] details, s [n] save, o [n] online, f favorites, n new search, q quit > ");
    } else {
        print!("\nEnter ingredients (e.g., chicken, rice, tomatoes): ");
    }
    let _ = std::io::stdout().flush();
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::init();

    let config = FinderConfig::load()?;
    let mut finder = RecipeFinder::builder().config(config).build()?;

    // Ingredients on the command line: single search, then exit
    let args: Vec<String> = env::args().skip(1).collect();
    if !args.is_empty() {
        let input = args.join(" ");
        return match search_once(&finder, &input).await {
            Ok(listing) => {
                print!("{}", listing);
                Ok(ExitCode::SUCCESS)
            }
            Err(message) => {
                eprintln!("{}", message);
                Ok(ExitCode::FAILURE)
            }
        };
    }

    println!("Recipe Finder");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut results: Vec<RecipeSummary> = Vec::new();

    loop {
        prompt(!results.is_empty());
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() && !results.is_empty() {
            continue;
        }

        let command = Command::parse(&line);
        debug!("{:?}", command);
        match command {
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::NewSearch => results.clear(),
            Command::Favorites => print!("{}", render_favorites(finder.favorites())),
            Command::Search(input) => {
                results.clear();
                match finder.search(&input).await.and_then(SearchOutcome::into_recipes) {
                    Ok(recipes) => {
                        results = recipes;
                        print!("{}", render_list(&results, |id| finder.is_favorite(id)));
                    }
                    Err(e) => println!("{}", render_error(&e)),
                }
            }
            Command::Details(n) => match pick(&results, n) {
                Some(recipe) => match finder.details(recipe.id).await {
                    Ok(recipe) => print!("{}", render_detail(&recipe)),
                    Err(e) => println!("Error loading recipe details: {}", render_error(&e)),
                },
                None => println!("No result number {}", n),
            },
            Command::ToggleFavorite(n) => match pick(&results, n).cloned() {
                Some(recipe) => {
                    let title = recipe.title.clone();
                    match finder.toggle_favorite(recipe) {
                        Ok(true) => println!("★ Saved {}", title),
                        Ok(false) => println!("☆ Removed {}", title),
                        Err(e) => println!("{}", render_error(&e)),
                    }
                }
                None => println!("No result number {}", n),
            },
            Command::Open(n) => match pick(&results, n) {
                Some(recipe) => println!("{}", recipe.spoonacular_url()),
                None => println!("No result number {}", n),
            },
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_finder::MemoryStorage;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("q"), Command::Quit);
        assert_eq!(Command::parse(" 2 "), Command::Details(2));
        assert_eq!(Command::parse("s 1"), Command::ToggleFavorite(1));
        assert_eq!(Command::parse("o 3"), Command::Open(3));
        assert_eq!(Command::parse("f"), Command::Favorites);
        assert_eq!(
            Command::parse("chicken, rice"),
            Command::Search("chicken, rice".to_string())
        );
        // An ingredient that merely starts with a command letter is a search
        assert_eq!(
            Command::parse("salt pork"),
            Command::Search("salt pork".to_string())
        );
    }

    #[tokio::test]
    async fn test_search_once_reports_failures() {
        let finder = RecipeFinder::builder()
            .api_key("key")
            .base_url("http://127.0.0.1:1")
            .build_with_storage(MemoryStorage::new())
            .unwrap();

        assert_eq!(
            search_once(&finder, " , ").await,
            Err("Please enter some ingredients!".to_string())
        );

        let unreachable = search_once(&finder, "chicken").await.unwrap_err();
        assert!(unreachable.starts_with("Failed to fetch recipes"));
    }

    #[test]
    fn test_pick_is_one_based() {
        let results = vec![RecipeSummary {
            id: 9,
            title: "Stew".to_string(),
            image: None,
            used_ingredients: vec![],
            missed_ingredients: vec![],
        }];
        assert_eq!(pick(&results, 1).map(|r| r.id), Some(9));
        assert!(pick(&results, 0).is_none());
        assert!(pick(&results, 2).is_none());
    }
}
