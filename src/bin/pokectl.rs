use arrrg::CommandLine;
use arrrg_derive::CommandLine;
use serde::Serialize;

use my_pokemon::{
    ApiResponse, NamedPokemon,
    cli_utils::{self, parse_pokemon_id_or_exit},
    http_utils::{self, PokemonClient},
};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Options {
    #[arrrg(optional, "Base URL of the my-pokemon API server")]
    base_url: String,
}

const USAGE: &str = r#"Usage: pokectl [options] <command> [args...]

Options:
  --base-url <url>     Base URL of the my-pokemon API server (default: http://localhost:8989)

Commands:
  list                 List owned pokemon
  catch <id> <name>    Try to catch a pokemon
  rename <id> <name>   Rename an owned pokemon
  release <id>         Try to release an owned pokemon"#;

fn expect_args(args: &[String], count: usize, usage: &str) {
    if args.len() != count {
        cli_utils::exit_with_usage_error("Wrong number of arguments", usage);
    }
}

fn report<T: Serialize>(response: &ApiResponse<T>) {
    println!("{}", response.message);
    if let Some(data) = &response.data {
        cli_utils::print_json_or_exit(data, "response data");
    }
    if !response.success {
        std::process::exit(2);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (options, free) = Options::from_command_line_relaxed("USAGE: pokectl <command> [args...]");

    if free.is_empty() {
        cli_utils::exit_with_usage_error("No command specified", USAGE);
    }

    let base_url = if options.base_url.is_empty() {
        "http://localhost:8989".to_string()
    } else {
        options.base_url
    };
    let client = PokemonClient::new(base_url);

    match free[0].as_str() {
        "list" => {
            expect_args(&free, 1, "Usage: pokectl list");
            let response =
                http_utils::execute_or_exit(|| client.list(), "Failed to list pokemon").await;
            report(&response);
        }
        "catch" => {
            const CATCH_USAGE: &str = "Usage: pokectl catch <id> <name>";
            expect_args(&free, 3, CATCH_USAGE);
            let request = NamedPokemon {
                pokemon_id: parse_pokemon_id_or_exit(&free[1], CATCH_USAGE),
                name: free[2].clone(),
            };
            let response =
                http_utils::execute_or_exit(|| client.catch(&request), "Failed to catch pokemon")
                    .await;
            report(&response);
        }
        "rename" => {
            const RENAME_USAGE: &str = "Usage: pokectl rename <id> <name>";
            expect_args(&free, 3, RENAME_USAGE);
            let request = NamedPokemon {
                pokemon_id: parse_pokemon_id_or_exit(&free[1], RENAME_USAGE),
                name: free[2].clone(),
            };
            let response =
                http_utils::execute_or_exit(|| client.rename(&request), "Failed to rename pokemon")
                    .await;
            report(&response);
        }
        "release" => {
            const RELEASE_USAGE: &str = "Usage: pokectl release <id>";
            expect_args(&free, 2, RELEASE_USAGE);
            let pokemon_id = parse_pokemon_id_or_exit(&free[1], RELEASE_USAGE);
            let response = http_utils::execute_or_exit(
                || client.release(pokemon_id),
                "Failed to release pokemon",
            )
            .await;
            report(&response);
        }
        "help" => println!("{}", USAGE),
        other => {
            cli_utils::exit_with_usage_error(&format!("Unknown command '{}'", other), USAGE);
        }
    }

    Ok(())
}
