use clap::{Args, Subcommand};

mod tree;

#[derive(Debug, Args)]
pub(crate) struct CategoriesCommand {
    #[command(subcommand)]
    command: CategoriesSubcommand,
}

#[derive(Debug, Subcommand)]
enum CategoriesSubcommand {
    /// Print every category's full path in tree order
    Tree(tree::TreeArgs),
}

pub(crate) async fn run(command: CategoriesCommand) -> Result<(), String> {
    match command.command {
        CategoriesSubcommand::Tree(args) => tree::run(args).await,
    }
}
