//! Removing animation from objects and curve sets from the host.

use hashbrown::HashSet;
use log::debug;

use crate::host::SceneHost;

/// Unbind the active curve set, remove every track, then drop the binding.
/// Each step is attempted even if an earlier one failed.
pub fn clear_object_animation<H: SceneHost + ?Sized>(host: &mut H, object: &str) {
    let Some(binding) = host.animation(object) else {
        return;
    };
    if let Err(e) = host.set_active_curve_set(object, None) {
        debug!("'{object}': active curve set not cleared: {e}");
    }
    for idx in (0..binding.tracks.len()).rev() {
        if let Err(e) = host.remove_track(object, idx) {
            debug!("'{object}': track {idx} not removed: {e}");
        }
    }
    if let Err(e) = host.clear_animation(object) {
        debug!("'{object}': animation binding not cleared: {e}");
        if let Err(e) = host.set_active_curve_set(object, None) {
            debug!("'{object}': active curve set still bound: {e}");
        }
    }
}

/// Summary of [`purge_curve_sets`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub unbound: usize,
    pub strips_removed: usize,
    pub tracks_removed: usize,
    pub curve_sets_removed: Vec<String>,
}

/// Detach every use of `names` from every object, drop tracks left empty,
/// then remove the curve sets themselves.
pub fn purge_curve_sets<H: SceneHost + ?Sized>(
    host: &mut H,
    names: impl IntoIterator<Item = String>,
) -> PurgeReport {
    let names: HashSet<String> = names.into_iter().collect();
    let mut report = PurgeReport::default();
    if names.is_empty() {
        return report;
    }

    for object in host.object_names() {
        let Some(binding) = host.animation(&object) else {
            continue;
        };
        if binding
            .active_curve_set
            .as_ref()
            .is_some_and(|a| names.contains(a))
        {
            match host.set_active_curve_set(&object, None) {
                Ok(()) => report.unbound += 1,
                Err(e) => debug!("'{object}': active curve set not cleared: {e}"),
            }
        }

        for (t_idx, track) in binding.tracks.iter().enumerate().rev() {
            let mut remaining = track.strips.len();
            for (s_idx, strip) in track.strips.iter().enumerate().rev() {
                if !strip.curve_set.as_ref().is_some_and(|c| names.contains(c)) {
                    continue;
                }
                match host.remove_strip(&object, t_idx, s_idx) {
                    Ok(()) => {
                        report.strips_removed += 1;
                        remaining -= 1;
                    }
                    Err(e) => debug!("'{object}': strip {t_idx}/{s_idx} not removed: {e}"),
                }
            }
            if remaining == 0 {
                match host.remove_track(&object, t_idx) {
                    Ok(()) => report.tracks_removed += 1,
                    Err(e) => debug!("'{object}': empty track {t_idx} not removed: {e}"),
                }
            }
        }
    }

    let mut sorted: Vec<_> = names.into_iter().collect();
    sorted.sort();
    for name in sorted {
        if !host.has_curve_set(&name) {
            continue;
        }
        match host.remove_curve_set(&name) {
            Ok(()) => report.curve_sets_removed.push(name),
            Err(e) => debug!("curve set '{name}' not removed: {e}"),
        }
    }
    report
}
