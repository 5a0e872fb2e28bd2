use std::env;

use ronda_backend::{connect_db, DbOwner, DbProfile};
use ronda_migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    // Select prod|test via env
    let profile = match env::var("MIGRATION_TARGET").as_deref() {
        Ok("test") => DbProfile::Test,
        _ => DbProfile::Prod,
    };

    // Subcommand: up | down | fresh | reset | refresh | status
    let cmd = env::args().nth(1).unwrap_or_else(|| "up".to_string());

    println!("cmd={cmd}  profile={profile:?}");

    // Connect with owner privileges (can create/drop types/tables)
    let db = connect_db(profile, DbOwner::Owner)
        .await
        .expect("failed to connect to database");

    let mig_count = <Migrator as MigratorTrait>::migrations().len();
    println!("runner sees {mig_count} migration(s)");

    let result = match cmd.as_str() {
        "up" => Migrator::up(&db, None).await,
        "down" => Migrator::down(&db, None).await,
        "fresh" => Migrator::fresh(&db).await,
        "reset" => Migrator::reset(&db).await,
        "refresh" => Migrator::refresh(&db).await,
        "status" => Migrator::status(&db).await,
        other => {
            eprintln!("unknown command: {other} (expected up|down|fresh|reset|refresh|status)");
            std::process::exit(2);
        }
    };

    if let Err(err) = result {
        eprintln!("{cmd} failed: {err}");
        std::process::exit(1);
    }
}
