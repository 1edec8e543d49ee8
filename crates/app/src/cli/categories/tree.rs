use clap::Args;
use serde::Serialize;
use storefront_app::{
    database::{self, Db},
    domain::categories::{
        CategoriesService, PgCategoriesService,
        records::{CategoryTreeEntry, CategoryUuid},
    },
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct TreeArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Only print this category and its descendants
    #[arg(long, value_name = "UUID")]
    under: Option<CategoryUuid>,

    /// Print one JSON object per line instead of indented paths
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct TreeLine<'a> {
    uuid: Uuid,
    slug: &'a str,
    level: u32,
    full_path: &'a str,
}

pub(crate) async fn run(args: TreeArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let mut entries = PgCategoriesService::new(Db::new(pool))
        .category_tree()
        .await
        .map_err(|error| format!("failed to load category tree: {error}"))?;

    if let Some(under) = args.under {
        entries = subtree(entries, under)
            .ok_or_else(|| format!("category {under} not found"))?;
    }

    if entries.is_empty() {
        println!("no categories");
        return Ok(());
    }

    for entry in &entries {
        let level = entry.category.bounds.level;

        if args.json {
            let line = serde_json::to_string(&TreeLine {
                uuid: entry.category.uuid.into_uuid(),
                slug: &entry.category.slug,
                level,
                full_path: &entry.full_path,
            })
            .map_err(|error| format!("failed to encode category: {error}"))?;

            println!("{line}");
        } else {
            let indent = "  ".repeat(usize::try_from(level).unwrap_or(0));

            println!("{indent}{} ({})", entry.full_path, entry.category.slug);
        }
    }

    Ok(())
}

fn subtree(entries: Vec<CategoryTreeEntry>, root: CategoryUuid) -> Option<Vec<CategoryTreeEntry>> {
    let bounds = entries
        .iter()
        .find(|entry| entry.category.uuid == root)?
        .category
        .bounds;

    Some(
        entries
            .into_iter()
            .filter(|entry| {
                entry.category.uuid == root || bounds.contains(&entry.category.bounds)
            })
            .collect(),
    )
}
