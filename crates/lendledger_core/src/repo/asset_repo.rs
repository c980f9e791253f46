//! Asset repository contract and SQLite implementation.
//!
//! # Invariants
//! - `add` inserts new assets as available; the issued flag only changes
//!   through `set_issued` or a loan batch.
//! - `add` with an existing id is a silent no-op.

use super::{ensure_connection_ready, parse_flag, RepoError, RepoResult};
use crate::model::asset::{Asset, AssetType};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};

const ASSET_SELECT_SQL: &str = "SELECT
    id,
    type,
    title,
    author_or_owner,
    is_issued
FROM assets";

const ASSET_COLUMNS: &[&str] = &["id", "type", "title", "author_or_owner", "is_issued"];

/// Repository interface for the asset collection.
pub trait AssetRepository {
    /// Inserts `asset` unless its id exists. Returns `true` when inserted.
    fn add(&self, asset: &Asset) -> RepoResult<bool>;
    fn find(&self, id: &str) -> RepoResult<Option<Asset>>;
    /// Full snapshot ordered by id.
    fn get_all(&self) -> RepoResult<Vec<Asset>>;
    fn set_issued(&self, id: &str, issued: bool) -> RepoResult<()>;
    fn is_issued(&self, id: &str) -> RepoResult<bool>;
}

/// SQLite-backed asset repository.
pub struct SqliteAssetRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAssetRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "assets", ASSET_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl AssetRepository for SqliteAssetRepository<'_> {
    fn add(&self, asset: &Asset) -> RepoResult<bool> {
        asset.validate()?;

        let changed = self.conn.execute(
            "INSERT INTO assets (id, type, title, author_or_owner, is_issued)
             VALUES (?1, ?2, ?3, ?4, 0)
             ON CONFLICT(id) DO NOTHING;",
            params![
                asset.id,
                asset.kind.as_str(),
                asset.title,
                asset.author_or_owner,
            ],
        )?;

        if changed == 0 {
            debug!(
                "event=asset_add module=repo status=skipped reason=duplicate_id asset_id={}",
                asset.id
            );
        }
        Ok(changed == 1)
    }

    fn find(&self, id: &str) -> RepoResult<Option<Asset>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ASSET_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_asset_row(row)?));
        }
        Ok(None)
    }

    fn get_all(&self) -> RepoResult<Vec<Asset>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ASSET_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut assets = Vec::new();
        while let Some(row) = rows.next()? {
            assets.push(parse_asset_row(row)?);
        }
        Ok(assets)
    }

    fn set_issued(&self, id: &str, issued: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE assets SET is_issued = ?2 WHERE id = ?1;",
            params![id, i64::from(issued)],
        )?;
        if changed == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    fn is_issued(&self, id: &str) -> RepoResult<bool> {
        let value: Option<i64> = self
            .conn
            .query_row("SELECT is_issued FROM assets WHERE id = ?1;", [id], |row| {
                row.get(0)
            })
            .optional()?;
        match value {
            Some(flag) => parse_flag(flag, "assets.is_issued"),
            None => Err(not_found(id)),
        }
    }
}

fn not_found(id: &str) -> RepoError {
    RepoError::NotFound {
        entity: "asset",
        id: id.to_string(),
    }
}

fn parse_asset_row(row: &Row<'_>) -> RepoResult<Asset> {
    let type_text: String = row.get("type")?;
    let kind = AssetType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid asset type `{type_text}` in assets.type"))
    })?;

    let asset = Asset {
        id: row.get("id")?,
        kind,
        title: row.get("title")?,
        author_or_owner: row.get("author_or_owner")?,
        issued: parse_flag(row.get("is_issued")?, "assets.is_issued")?,
    };
    asset.validate()?;
    Ok(asset)
}
