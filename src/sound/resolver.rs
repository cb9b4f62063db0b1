use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::utils::create_dir_if_not_exists;
use super::types::SoundAliasTable;

/// Fixed first line of a consolidated alias table. The downstream tool
/// rejects files whose first line deviates from this byte sequence.
pub const CONSOLIDATED_CSV_HEADER: &str = "Name,Behavior,Storage,FileSpec,FileSpecSustain,FileSpecRelease,Template,Loadspec,Secondary,SustainAlias,ReleaseAlias,Bus,VolumeGroup,DuckGroup,Duck,ReverbSend,CenterSend,VolMin,VolMax,DistMin,DistMaxDry,DistMaxWet,DryMinCurve,DryMaxCurve,WetMinCurve,WetMaxCurve,LimitCount,LimitType,EntityLimitCount,EntityLimitType,PitchMin,PitchMax,PriorityMin,PriorityMax,PriorityThresholdMin,PriorityThresholdMax,AmplitudePriority,PanType,Pan,Futz,Looping,RandomizeType,Probability,StartDelay,EnvelopMin,EnvelopMax,EnvelopPercent,OcclusionLevel,IsBig,DistanceLpf,FluxType,FluxTime,Subtitle,Doppler,ContextType,ContextValue,ContextType1,ContextValue1,ContextType2,ContextValue2,ContextType3,ContextValue3,Timescale,IsMusic,IsCinematic,FadeIn,FadeOut,Pauseable,StopOnEntDeath,Compression,StopOnPlay,DopplerScale,FutzPatch,VoiceLimit,IgnoreMaxDist,NeverPlayTwice,ContinuousPan,FileSource,FileSourceSustain,FileSourceRelease,FileTarget,FileTargetSustain,FileTargetRelease,Platform,Language,OutputDevices,PlatformMask,WiiUMono,StopAlias,DistanceLpfMin,DistanceLpfMax,FacialAnimationName,RestartContextLoops,SilentInCPZ,ContextFailsafe,GPAD,GPADOnly,MuteVoice,MuteMusic,RowSourceFileName,RowSourceShortName,RowSourceLineNumber";

/// Rows pad the name and file-path fields out to this many columns before
/// secondary aliases begin.
const MIN_LEADING_FIELDS: usize = 8;

/// Resolve an alias to every sound file reachable through its chain.
///
/// Uses an explicit worklist with one visited set for the whole traversal,
/// so diamond and cyclic alias graphs visit each alias body at most once.
/// An alias absent from the table resolves to an empty list, not an error.
pub fn resolve_alias_files(name: &str, table: &SoundAliasTable) -> Vec<String> {
    let mut files: Vec<String> = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut stack = vec![name.to_string()];

    while let Some(current) = stack.pop() {
        if !visited.insert(current.to_lowercase()) {
            continue;
        }

        let Some(alias) = table.get(&current) else {
            continue;
        };

        for path in &alias.file_paths {
            if !files.contains(path) {
                files.push(path.clone());
            }
        }

        // push in reverse so earlier chained references resolve first
        for secondary in alias.secondary_aliases.iter().rev() {
            stack.push(secondary.clone());
        }
    }

    files
}

/// Collect the full transitive closure of alias names reachable from the
/// given roots. Names keep their referenced spelling; visitation is
/// case-insensitive.
pub fn collect_alias_closure<'a>(
    roots: impl IntoIterator<Item = &'a str>,
    table: &SoundAliasTable,
) -> BTreeSet<String> {
    let mut collected: BTreeSet<String> = BTreeSet::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut stack: Vec<String> = roots.into_iter().map(str::to_string).collect();

    while let Some(current) = stack.pop() {
        if !visited.insert(current.to_lowercase()) {
            continue;
        }
        collected.insert(current.clone());

        if let Some(alias) = table.get(&current) {
            for secondary in &alias.secondary_aliases {
                stack.push(secondary.clone());
            }
        }
    }

    collected
}

/// Write a consolidated alias table containing only the aliases reachable
/// from `referenced`, one row per alias, sorted by name.
///
/// The first output line is [`CONSOLIDATED_CSV_HEADER`] — a wire contract
/// with the downstream consumer. Referenced names missing from the table
/// produce no row.
pub fn write_consolidated_csv<'a>(
    referenced: impl IntoIterator<Item = &'a str>,
    table: &SoundAliasTable,
    output: &Path,
) -> Result<()> {
    let needed = collect_alias_closure(referenced, table);

    let mut lines: Vec<String> = Vec::with_capacity(needed.len() + 3);
    lines.push(CONSOLIDATED_CSV_HEADER.to_string());
    lines.push("# Consolidated sound aliases".to_string());
    lines.push(String::new());

    for name in &needed {
        let Some(alias) = table.get(name) else {
            continue;
        };

        let mut fields: Vec<String> = vec![alias.name.clone(), String::new(), String::new()];
        fields.extend(alias.file_paths.iter().cloned());
        while fields.len() < MIN_LEADING_FIELDS {
            fields.push(String::new());
        }
        fields.extend(alias.secondary_aliases.iter().cloned());

        lines.push(fields.join(","));
    }

    if let Some(parent) = output.parent() {
        create_dir_if_not_exists(parent)?;
    }
    std::fs::write(output, lines.join("\n") + "\n")
        .with_context(|| format!("failed to write consolidated table {}", output.display()))?;

    info!(
        "Consolidated alias table written with {} aliases to {}",
        needed.len(),
        output.display()
    );

    Ok(())
}
