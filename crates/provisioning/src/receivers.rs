use models::{AlertingConfig, Integration, Receiver};

/// Fold an updated integration back into the configuration's receiver
/// groups, keeping every group internally consistent.
///
/// Contact points are individually addressable by uid, but the stored
/// document groups them into named receivers whose members must all share
/// the group's name. Renaming one integration can therefore require moving
/// it into a different (possibly brand-new) group, or renaming its current
/// group outright. Groups whose members were already inconsistently named
/// are repaired along the way rather than rejected.
///
/// Returns whether `config` was modified. An update whose uid exists is
/// always a modification, even when the replacement is value-identical;
/// callers needing a semantic diff must compare for themselves.
pub fn stitch_receiver(config: &mut AlertingConfig, target: &Integration) -> bool {
    let located = config.receivers.iter().enumerate().find_map(|(g, group)| {
        group
            .integrations
            .iter()
            .position(|i| i.uid == target.uid)
            .map(|m| (g, m))
    });
    let Some((group_idx, member_idx)) = located else {
        // The uid exists nowhere: nothing to stitch.
        return false;
    };

    // Whether a group other than the member's current one already carries
    // the new name. If so the member always moves there, even out of a
    // group it was the last member of.
    let target_group_exists = config
        .receivers
        .iter()
        .enumerate()
        .any(|(g, group)| g != group_idx && group.name == target.name);

    {
        let group = &mut config.receivers[group_idx];

        // A plain field change keeps the member exactly where it is.
        if group.integrations[member_idx].name == target.name {
            group.integrations[member_idx] = target.clone();
            return true;
        }

        // Renaming the sole member of a group to a novel name renames the
        // group in place, keeping its position in the receiver list.
        if !target_group_exists && group.integrations.len() == 1 {
            group.name = target.name.clone();
            group.integrations[member_idx] = target.clone();
            return true;
        }

        // Otherwise the member moves out of its old group. Remaining members
        // whose stored name disagrees with the group are healed while we are
        // here.
        group.integrations.remove(member_idx);
        for member in &mut group.integrations {
            if member.name != group.name {
                member.name = group.name.clone();
            }
        }
    }
    if config.receivers[group_idx].integrations.is_empty() {
        config.receivers.remove(group_idx);
    }

    // Land the member in the group matching its new name, creating that
    // group at the end of the list when it doesn't exist yet.
    match config
        .receivers
        .iter_mut()
        .find(|group| group.name == target.name)
    {
        Some(group) => group.integrations.push(target.clone()),
        None => config.receivers.push(Receiver {
            name: target.name.clone(),
            integrations: vec![target.clone()],
        }),
    }
    true
}
