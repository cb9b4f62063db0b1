use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

use super::*;
use crate::gdt::parse_gdt_files;
use crate::sound::parse_alias_files;

fn touch(root: &Path, relative: &str, content: &str) {
    let path = join_relative(root, relative);
    fs::create_dir_all(path.parent().unwrap()).expect("failed to create parent dirs");
    fs::write(&path, content).expect("failed to write content file");
}

fn write_definitions(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("failed to write definition file");
    path
}

#[test]
fn test_clean_asset_path() {
    assert_eq!(
        clean_asset_path("  ..\\model_export\\gun.xmodel  "),
        Some("model_export/gun.xmodel".to_string())
    );
    assert_eq!(
        clean_asset_path("../../textures/steel.tif"),
        Some("textures/steel.tif".to_string())
    );
    assert_eq!(
        clean_asset_path(".\\icons\\hud.png"),
        Some("icons/hud.png".to_string())
    );
    assert_eq!(
        clean_asset_path("sounds\\\\weapons\\\\shot.wav"),
        Some("sounds/weapons/shot.wav".to_string())
    );
}

#[test]
fn test_clean_asset_path_drops_placeholders() {
    assert_eq!(clean_asset_path("   "), None);
    assert_eq!(clean_asset_path("$white"), None);
    assert_eq!(clean_asset_path("ximage_5fa02dbcae7d"), None);
    assert_eq!(clean_asset_path("generated_gloss_map"), None, "No extension, no separator");
    // A bare filename with an extension is still a real reference
    assert_eq!(clean_asset_path("readme.txt"), Some("readme.txt".to_string()));
}

#[test]
fn test_fx_paths_map_under_share_raw() -> Result<()> {
    let root = tempdir()?;
    touch(root.path(), "share/raw/fx/muzzle/flash.efx", "fx");

    let resolved = resolve_asset_path("fx\\muzzle\\flash.efx", root.path()).unwrap();

    assert_eq!(resolved.relative, "share/raw/fx/muzzle/flash.efx");
    assert!(resolved.exists);

    // The mapping holds regardless of input depth or existence
    let deep = resolve_asset_path("fx/some/very/deep/trail.efx", root.path()).unwrap();
    assert_eq!(resolved_root(&deep.relative), "share");
    assert!(deep.relative.starts_with("share/raw/fx/"));
    assert!(!deep.exists);
    Ok(())
}

fn resolved_root(relative: &str) -> &str {
    relative.split('/').next().unwrap_or(relative)
}

#[test]
fn test_xanim_prefers_xanim_export() -> Result<()> {
    let root = tempdir()?;
    touch(root.path(), "xanim_export/weapons/reload.xanim", "anim");
    touch(root.path(), "model_export/weapons/reload.xanim", "anim");

    let resolved = resolve_asset_path("weapons\\reload.xanim", root.path()).unwrap();

    assert_eq!(resolved.relative, "xanim_export/weapons/reload.xanim");
    assert!(resolved.exists);
    Ok(())
}

#[test]
fn test_xanim_falls_back_to_model_export() -> Result<()> {
    let root = tempdir()?;
    touch(root.path(), "model_export/weapons/raise.xanim", "anim");

    let resolved = resolve_asset_path("weapons\\raise.xanim", root.path()).unwrap();

    assert_eq!(
        resolved.relative, "model_export/weapons/raise.xanim",
        "When only model_export has the file, it must be selected"
    );
    assert!(resolved.exists);
    Ok(())
}

#[test]
fn test_xanim_missing_keeps_first_attempt() -> Result<()> {
    let root = tempdir()?;

    let resolved = resolve_asset_path("weapons\\missing.xanim", root.path()).unwrap();

    assert_eq!(resolved.relative, "xanim_export/weapons/missing.xanim");
    assert!(!resolved.exists);
    Ok(())
}

#[test]
fn test_xmodel_maps_under_model_export() -> Result<()> {
    let root = tempdir()?;
    touch(root.path(), "model_export/weapons/gun.xmodel", "model");

    let resolved = resolve_asset_path("weapons\\gun.xmodel", root.path()).unwrap();
    assert_eq!(resolved.relative, "model_export/weapons/gun.xmodel");
    assert!(resolved.exists);

    // Already-rooted paths are left alone
    let rooted = resolve_asset_path("model_export\\weapons\\gun.xmodel", root.path()).unwrap();
    assert_eq!(rooted.relative, "model_export/weapons/gun.xmodel");
    Ok(())
}

#[test]
fn test_model_path_is_forced_for_attachments() -> Result<()> {
    let root = tempdir()?;
    touch(root.path(), "model_export/attachments/grip.xmodel", "model");

    let resolved = resolve_model_path("attachments\\grip.xmodel", root.path()).unwrap();

    assert_eq!(resolved.relative, "model_export/attachments/grip.xmodel");
    assert!(resolved.exists);
    Ok(())
}

#[test]
fn test_missing_model_reports_original_declared_path() -> Result<()> {
    let content_root = tempdir()?;
    let definitions = tempdir()?;
    let gdt = write_definitions(
        definitions.path(),
        "wpn_test.gdt",
        r#"{
	"wpn_test" ( "weapon.gdf" )
	{
		"model" "model_export\test.xmodel"
	}
}
"#,
    );

    let parse_result = parse_gdt_files(std::slice::from_ref(&gdt));
    let report = scan_assets(&parse_result, content_root.path(), None, &[gdt], None);

    assert_eq!(report.assets.len(), 1);
    let asset = &report.assets[0];
    assert!(!asset.exists);
    assert_eq!(asset.asset_name, "wpn_test");
    assert_eq!(asset.asset_kind, "weapon.gdf");
    assert_eq!(
        report.missing_paths,
        vec!["model_export\\test.xmodel".to_string()],
        "Missing list preserves the literal declared string"
    );
    assert_eq!(report.missing_count, 1);
    assert_eq!(report.found_count, 0);
    Ok(())
}

#[test]
fn test_invalid_root_short_circuits() -> Result<()> {
    let definitions = tempdir()?;
    let gdt = write_definitions(
        definitions.path(),
        "wpn.gdt",
        r#"{
	"wpn_any" ( "weapon.gdf" )
	{
		"model" "weapons\any.xmodel"
	}
}
"#,
    );

    let parse_result = parse_gdt_files(std::slice::from_ref(&gdt));
    let report = scan_assets(
        &parse_result,
        Path::new("/definitely/not/a/real/root"),
        None,
        &[gdt],
        None,
    );

    assert_eq!(report.errors.len(), 1, "Exactly one top-level error");
    assert!(report.assets.is_empty());
    assert_eq!(report.found_count, 0);
    Ok(())
}

#[test]
fn test_found_assets_accumulate_size() -> Result<()> {
    let content_root = tempdir()?;
    let definitions = tempdir()?;
    touch(content_root.path(), "model_export/weapons/gun.xmodel", "0123456789");
    touch(content_root.path(), "share/raw/fx/flash.efx", "01234");

    let gdt = write_definitions(
        definitions.path(),
        "wpn.gdt",
        r#"{
	"wpn_gun" ( "weapon.gdf" )
	{
		"model" "weapons\gun.xmodel"
		"flashEffect" "fx\flash.efx"
	}
}
"#,
    );

    let parse_result = parse_gdt_files(std::slice::from_ref(&gdt));
    let report = scan_assets(&parse_result, content_root.path(), None, &[gdt], None);

    assert_eq!(report.found_count, 2);
    assert_eq!(report.missing_count, 0);
    assert_eq!(report.total_bytes, 15);
    Ok(())
}

#[test]
fn test_engine_placeholders_are_not_reported_missing() -> Result<()> {
    let content_root = tempdir()?;
    let definitions = tempdir()?;
    let gdt = write_definitions(
        definitions.path(),
        "mtl.gdt",
        r#"{
	"mtl_steel" ( "material.gdf" )
	{
		"baseImage" "$white"
		"normalMap" "ximage_70abf311"
		"glossMap" "generated_gloss"
		"texture" "textures\steel.tif"
	}
}
"#,
    );

    let parse_result = parse_gdt_files(std::slice::from_ref(&gdt));
    let report = scan_assets(&parse_result, content_root.path(), None, &[gdt], None);

    assert_eq!(report.assets.len(), 1, "Only the real texture is verified");
    assert_eq!(report.missing_paths, vec!["textures\\steel.tif".to_string()]);
    Ok(())
}

#[test]
fn test_attachment_paths_forced_to_model_export() -> Result<()> {
    let content_root = tempdir()?;
    let definitions = tempdir()?;
    touch(
        content_root.path(),
        "model_export/attachments/suppressor.xmodel",
        "model",
    );

    write_definitions(
        definitions.path(),
        "_wpn_common.gdt",
        r#"{
	"attach_suppressor_view" ( "xmodel.gdf" )
	{
		"filename" "attachments\suppressor.xmodel"
	}
}
"#,
    );
    let gdt = write_definitions(
        definitions.path(),
        "wpn.gdt",
        r#"{
	"wpn_ar" ( "weapon.gdf" )
	{
		"attachViewModel1" "attach_suppressor_view"
	}
}
"#,
    );

    let parse_result = parse_gdt_files(std::slice::from_ref(&gdt));
    let report = scan_assets(&parse_result, content_root.path(), None, &[gdt], None);

    assert_eq!(report.resolved_attachments.len(), 1);
    assert_eq!(report.assets.len(), 1);
    let asset = &report.assets[0];
    assert_eq!(asset.relative_path, "model_export/attachments/suppressor.xmodel");
    assert!(asset.exists);
    assert!(asset.asset_kind.contains("attachment"));
    Ok(())
}

#[test]
fn test_shared_groups_resolve_to_aliases() -> Result<()> {
    let content_root = tempdir()?;
    let definitions = tempdir()?;
    touch(content_root.path(), "sound_assets/weapons/fire.wav", "wav");
    fs::create_dir_all(
        content_root
            .path()
            .join("share")
            .join("raw")
            .join("sound")
            .join("aliases"),
    )?;
    fs::write(
        content_root
            .path()
            .join("share")
            .join("raw")
            .join("sound")
            .join("aliases")
            .join("wpn.csv"),
        "wpn_ar_fire,,,weapons/fire.wav\n",
    )?;

    write_definitions(
        definitions.path(),
        "_wpn_common.gdt",
        r#"{
	"common_ar_sounds" ( "sharedweaponsounds.gdf" )
	{
		"fireSound" "wpn_ar_fire"
	}
}
"#,
    );
    let gdt = write_definitions(
        definitions.path(),
        "wpn.gdt",
        r#"{
	"wpn_ar" ( "weapon.gdf" )
	{
		"sharedWeaponSounds" "common_ar_sounds"
	}
}
"#,
    );

    let parse_result = parse_gdt_files(std::slice::from_ref(&gdt));
    let alias_result = parse_alias_files(content_root.path());
    let report = scan_assets(
        &parse_result,
        content_root.path(),
        Some(&alias_result),
        &[gdt],
        None,
    );

    assert_eq!(report.referenced_sound_aliases, vec!["wpn_ar_fire".to_string()]);
    assert_eq!(report.sound_files.len(), 1);
    let sound = &report.sound_files[0];
    assert_eq!(sound.relative_path, "sound_assets/weapons/fire.wav");
    assert!(sound.exists);
    assert_eq!(sound.asset_kind, "soundalias");
    Ok(())
}

#[test]
fn test_apply_replacement_reverifies_and_is_idempotent() -> Result<()> {
    let content_root = tempdir()?;
    let definitions = tempdir()?;
    touch(content_root.path(), "model_export/weapons/gun_v2.xmodel", "new model");

    let gdt = write_definitions(
        definitions.path(),
        "wpn.gdt",
        r#"{
	"wpn_gun" ( "weapon.gdf" )
	{
		"model" "weapons\gun.xmodel"
	}
}
"#,
    );

    let parse_result = parse_gdt_files(std::slice::from_ref(&gdt));
    let mut report = scan_assets(&parse_result, content_root.path(), None, &[gdt], None);
    assert_eq!(report.missing_count, 1);

    let applied = report.apply_replacement(
        "weapons\\gun.xmodel",
        "model_export/weapons/gun_v2.xmodel",
        content_root.path(),
    );

    assert!(applied);
    assert_eq!(report.found_count, 1);
    assert_eq!(report.missing_count, 0);
    assert!(report.missing_paths.is_empty());
    assert_eq!(report.total_bytes, 9);
    assert!(report.assets[0].exists);

    // Re-applying the same fix must not change counts or totals
    let reapplied = report.apply_replacement(
        "weapons\\gun.xmodel",
        "model_export/weapons/gun_v2.xmodel",
        content_root.path(),
    );
    assert!(reapplied);
    assert_eq!(report.found_count, 1);
    assert_eq!(report.missing_count, 0);
    assert_eq!(report.total_bytes, 9);

    // Unknown originals are rejected
    assert!(!report.apply_replacement("nope.xmodel", "model_export/x.xmodel", content_root.path()));
    Ok(())
}
