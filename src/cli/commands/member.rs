use crate::config::Config;
use crate::db::Store;

pub async fn cmd_member_add(config: &Config, name: &str) -> anyhow::Result<()> {
    let name = name.trim();
    if name.is_empty() {
        println!("Member name cannot be empty.");
        return Ok(());
    }

    let store = Store::new(&config.general.database_path).await?;
    if store.add_member_if_absent(name).await? {
        println!("✓ Added member: {name}");
    } else {
        println!("Member already exists: {name}");
    }

    Ok(())
}

pub async fn cmd_member_list(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let members = store.list_members().await?;

    if members.is_empty() {
        println!("No family members yet.");
        return Ok(());
    }

    println!("Family members ({} total)", members.len());
    println!("{:-<40}", "");
    for member in members {
        println!("• {}", member.name);
    }

    Ok(())
}
