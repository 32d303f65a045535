use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blendmap_core::{RecordingGrid, TerrainCatalog, TileMap};
use blendmap_transition::{mask_diagram, shape_facing, ResolveStats, TransitionResolver, SHAPES};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Terrain transition tools for tile maps", long_about = None)]
struct Args {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recompute every transition overlay in a map
    Resolve {
        /// Terrain catalog (.toml or .json)
        #[arg(long)]
        catalog: PathBuf,

        /// Map JSON file
        #[arg(long)]
        map: PathBuf,

        /// Where to write the resolved map (nothing is written if omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the legal transition shapes
    Shapes,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Resolve { catalog, map, out } => {
            let stats = resolve(&catalog, &map, out.as_deref())?;
            println!(
                "{} cells: {} blended, {} flat, {} skipped, {} changed",
                stats.total(),
                stats.blended,
                stats.flattened,
                stats.skipped,
                stats.changed
            );
        }
        Command::Shapes => print!("{}", shape_listing()),
    }
    Ok(())
}

/// Resolve every tile of the map at `map_path`, writing the result to `out`
fn resolve(catalog_path: &Path, map_path: &Path, out: Option<&Path>) -> Result<ResolveStats> {
    let catalog = TerrainCatalog::load(catalog_path)
        .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;
    info!(
        "Loaded {} terrains from {}",
        catalog.len(),
        catalog_path.display()
    );

    let mut map = TileMap::load(map_path)
        .with_context(|| format!("Failed to load map {}", map_path.display()))?;

    let resolver = TransitionResolver::new(&catalog);
    let mut grid = RecordingGrid::new(&mut map);
    let stats = resolver.resolve_all(&mut grid);
    for (coord, tile) in grid.writes() {
        debug!("{:?} -> {:?}", coord, tile);
    }

    if let Some(out) = out {
        map.save(out)
            .with_context(|| format!("Failed to write map {}", out.display()))?;
        info!("Wrote {}", out.display());
    }
    Ok(stats)
}

fn shape_listing() -> String {
    let mut listing = String::new();
    for (idx, mask) in SHAPES.iter().enumerate() {
        let id = idx as u8 + 1;
        let facing = shape_facing(id).map_or("?", |dir| dir.label());
        listing.push_str(&format!(
            "shape {:2} (facing {}) mask {:08b}\n{}\n\n",
            id,
            facing,
            mask,
            mask_diagram(*mask)
        ));
    }
    listing
}

#[cfg(test)]
mod tests {
    use super::*;
    use blendmap_core::{TileCoord, TileGrid, TileRecord};
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("blendmap_cli_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const CATALOG: &str = r#"
[[terrains]]
id = 5
name = "Grass"
priority = 1

[[terrains]]
id = 9
name = "Water"
priority = 5
"#;

    #[test]
    fn resolve_writes_blended_map() {
        let dir = scratch_dir("resolve");
        let catalog_path = dir.join("terrain.toml");
        let map_path = dir.join("map.json");
        let out_path = dir.join("resolved.json");
        fs::write(&catalog_path, CATALOG).unwrap();
        TileMap::from_base_ids(3, 3, &[5, 9, 5, 5, 5, 9, 5, 5, 5])
            .save(&map_path)
            .unwrap();

        let stats = resolve(&catalog_path, &map_path, Some(&out_path)).unwrap();

        assert_eq!(stats.total(), 9);
        assert_eq!(stats.blended, 1);
        assert_eq!(stats.changed, 1);
        let resolved = TileMap::load(&out_path).unwrap();
        assert_eq!(
            resolved.get_tile(TileCoord::new(1, 1, 0)),
            Some(TileRecord::encode(5, 9, 2))
        );
        // The input map is left alone
        let input = TileMap::load(&map_path).unwrap();
        assert_eq!(
            input.get_tile(TileCoord::new(1, 1, 0)),
            Some(TileRecord::plain(5))
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn resolve_reports_which_file_failed() {
        let dir = scratch_dir("missing");
        let catalog_path = dir.join("terrain.toml");
        fs::write(&catalog_path, CATALOG).unwrap();
        let map_path = dir.join("nope.json");

        let err = resolve(&catalog_path, &map_path, None).unwrap_err();
        assert!(format!("{}", err).contains("nope.json"), "{:#}", err);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn shape_listing_covers_the_catalog() {
        let listing = shape_listing();
        assert_eq!(listing.matches("shape ").count(), SHAPES.len());
        assert!(listing.starts_with("shape  1 (facing N) mask 10000011\n###\n.o.\n...\n"));
    }
}
