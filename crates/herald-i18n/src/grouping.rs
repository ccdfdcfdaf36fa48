//! Per-locale recipient batching
//!
//! A broadcast formats each message once per distinct locale instead of once
//! per recipient. [`LanguageGrouper`] partitions recipients by effective
//! locale into a reusable buffer.
//!
//! # Invariants
//!
//! 1. **Completeness**: every recipient that passes the filter lands in
//!    exactly one group, and no other recipient appears.
//!
//! 2. **Determinism**: groups appear in first-seen locale order and members
//!    keep input order.
//!
//! 3. **Single owner**: the returned slice borrows the grouper mutably, so a
//!    result must be consumed before the next call.

use crate::locale::{Locale, RecipientIdentity};
use crate::resolver::LocaleResolver;
use herald_common::{PermissionLevel, RecipientId, SquadId, TeamId};
use std::sync::Arc;
use tracing::debug;

/// Something a message can be addressed to
pub trait Recipient {
    /// Explicit locale or a recipient id to look up
    fn identity(&self) -> RecipientIdentity;

    /// Recipient id, if the identity carries one
    fn recipient_id(&self) -> Option<RecipientId> {
        match self.identity() {
            RecipientIdentity::Recipient(id) => Some(id),
            RecipientIdentity::Locale(_) => None,
        }
    }

    /// Team membership
    fn team(&self) -> Option<TeamId> {
        None
    }

    /// Squad within the team
    fn squad(&self) -> Option<SquadId> {
        None
    }

    /// Permission level
    fn permission_level(&self) -> PermissionLevel {
        PermissionLevel::Member
    }
}

impl Recipient for RecipientId {
    fn identity(&self) -> RecipientIdentity {
        RecipientIdentity::Recipient(*self)
    }
}

impl Recipient for RecipientIdentity {
    fn identity(&self) -> RecipientIdentity {
        self.clone()
    }
}

impl<R: Recipient + ?Sized> Recipient for &R {
    fn identity(&self) -> RecipientIdentity {
        (**self).identity()
    }

    fn recipient_id(&self) -> Option<RecipientId> {
        (**self).recipient_id()
    }

    fn team(&self) -> Option<TeamId> {
        (**self).team()
    }

    fn squad(&self) -> Option<SquadId> {
        (**self).squad()
    }

    fn permission_level(&self) -> PermissionLevel {
        (**self).permission_level()
    }
}

impl<R: Recipient + ?Sized> Recipient for Arc<R> {
    fn identity(&self) -> RecipientIdentity {
        (**self).identity()
    }

    fn recipient_id(&self) -> Option<RecipientId> {
        (**self).recipient_id()
    }

    fn team(&self) -> Option<TeamId> {
        (**self).team()
    }

    fn squad(&self) -> Option<SquadId> {
        (**self).squad()
    }

    fn permission_level(&self) -> PermissionLevel {
        (**self).permission_level()
    }
}

/// Recipients sharing one effective locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageGroup<T> {
    locale: Locale,
    members: Vec<T>,
}

impl<T> LanguageGroup<T> {
    /// The shared locale
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Members in input order
    pub fn members(&self) -> &[T] {
        &self.members
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Reusable grouping buffer; keep one per thread or context
#[derive(Debug)]
pub struct LanguageGrouper<T> {
    groups: Vec<LanguageGroup<T>>,
    active: usize,
}

impl<T> Default for LanguageGrouper<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LanguageGrouper<T> {
    /// Create an empty grouper
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            active: 0,
        }
    }

    /// Groups from the most recent call
    pub fn groups(&self) -> &[LanguageGroup<T>] {
        &self.groups[..self.active]
    }

    /// Drop all members, keeping allocated capacity
    pub fn clear(&mut self) {
        for group in &mut self.groups {
            group.members.clear();
        }
        self.active = 0;
    }

    fn slot(&mut self, locale: Locale, reserve: usize) -> usize {
        if let Some(index) = self.groups[..self.active]
            .iter()
            .position(|group| group.locale == locale)
        {
            return index;
        }

        let index = self.active;
        if let Some(group) = self.groups.get_mut(index) {
            group.locale = locale;
        } else {
            self.groups.push(LanguageGroup {
                locale,
                members: Vec::new(),
            });
        }
        self.groups[index].members.reserve(reserve);
        self.active += 1;
        index
    }
}

impl<T: Recipient> LanguageGrouper<T> {
    /// Partition all recipients by effective locale
    pub fn group<I>(&mut self, recipients: I, resolver: &LocaleResolver<'_>) -> &[LanguageGroup<T>]
    where
        I: IntoIterator<Item = T>,
    {
        self.group_where(recipients, resolver, |_| true)
    }

    /// Partition the recipients accepted by `filter`
    pub fn group_where<I, F>(
        &mut self,
        recipients: I,
        resolver: &LocaleResolver<'_>,
        mut filter: F,
    ) -> &[LanguageGroup<T>]
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&T) -> bool,
    {
        self.clear();

        let recipients = recipients.into_iter();
        let hint = recipients.size_hint().0;
        let default_locale = resolver.default_locale();
        let mut total = 0usize;

        for recipient in recipients.filter(|r| filter(r)) {
            let locale = resolver.effective_locale(&recipient.identity());
            let reserve = if &locale == default_locale { hint } else { 0 };
            let index = self.slot(locale, reserve);
            self.groups[index].members.push(recipient);
            total += 1;
        }

        debug!(
            "Grouped {} recipient(s) into {} locale group(s)",
            total, self.active
        );
        self.groups()
    }

    /// Only members of `team`
    pub fn group_team<I>(
        &mut self,
        recipients: I,
        resolver: &LocaleResolver<'_>,
        team: TeamId,
    ) -> &[LanguageGroup<T>]
    where
        I: IntoIterator<Item = T>,
    {
        self.group_where(recipients, resolver, |r| r.team() == Some(team))
    }

    /// Only members of `squad` within `team`
    pub fn group_squad<I>(
        &mut self,
        recipients: I,
        resolver: &LocaleResolver<'_>,
        team: TeamId,
        squad: SquadId,
    ) -> &[LanguageGroup<T>]
    where
        I: IntoIterator<Item = T>,
    {
        self.group_where(recipients, resolver, |r| {
            r.team() == Some(team) && r.squad() == Some(squad)
        })
    }

    /// Only recipients at or above `level`
    pub fn group_min_permission<I>(
        &mut self,
        recipients: I,
        resolver: &LocaleResolver<'_>,
        level: PermissionLevel,
    ) -> &[LanguageGroup<T>]
    where
        I: IntoIterator<Item = T>,
    {
        self.group_where(recipients, resolver, |r| r.permission_level() >= level)
    }

    /// Everyone except the recipient `excluded`
    pub fn group_except<I>(
        &mut self,
        recipients: I,
        resolver: &LocaleResolver<'_>,
        excluded: RecipientId,
    ) -> &[LanguageGroup<T>]
    where
        I: IntoIterator<Item = T>,
    {
        self.group_where(recipients, resolver, |r| r.recipient_id() != Some(excluded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TranslationCatalog;
    use crate::locale::LocalePreferences;

    struct Player {
        id: RecipientId,
        team: TeamId,
        squad: Option<SquadId>,
        level: PermissionLevel,
    }

    impl Recipient for Player {
        fn identity(&self) -> RecipientIdentity {
            self.id.into()
        }

        fn team(&self) -> Option<TeamId> {
            Some(self.team)
        }

        fn squad(&self) -> Option<SquadId> {
            self.squad
        }

        fn permission_level(&self) -> PermissionLevel {
            self.level
        }
    }

    fn player(id: u64, team: u8, squad: Option<u8>, level: PermissionLevel) -> Player {
        Player {
            id: RecipientId(id),
            team: TeamId(team),
            squad: squad.map(SquadId),
            level,
        }
    }

    fn fixture() -> (TranslationCatalog, LocalePreferences) {
        let catalog = TranslationCatalog::builder("en").entry("en", "k", "v").build();
        let prefs: LocalePreferences = [
            (RecipientId(1), "fr"),
            (RecipientId(3), "fr"),
            (RecipientId(4), "de"),
        ]
        .into_iter()
        .collect();
        (catalog, prefs)
    }

    fn summary<T: Recipient>(groups: &[LanguageGroup<T>]) -> Vec<(String, Vec<u64>)> {
        groups
            .iter()
            .map(|g| {
                let ids = g
                    .members()
                    .iter()
                    .filter_map(|m| m.recipient_id().map(|id| id.0))
                    .collect();
                (g.locale().to_string(), ids)
            })
            .collect()
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let (catalog, prefs) = fixture();
        let resolver = LocaleResolver::new(&catalog, &prefs);
        let mut grouper = LanguageGrouper::new();

        let groups = grouper.group((0..5).map(RecipientId), &resolver);
        assert_eq!(
            summary(groups),
            vec![
                ("en".to_string(), vec![0, 2]),
                ("fr".to_string(), vec![1, 3]),
                ("de".to_string(), vec![4]),
            ]
        );
    }

    #[test]
    fn test_buffer_is_reset_between_calls() {
        let (catalog, prefs) = fixture();
        let resolver = LocaleResolver::new(&catalog, &prefs);
        let mut grouper = LanguageGrouper::new();

        grouper.group((0..5).map(RecipientId), &resolver);
        let groups = grouper.group([RecipientId(4)], &resolver);
        assert_eq!(summary(groups), vec![("de".to_string(), vec![4])]);
        assert_eq!(grouper.groups().len(), 1);

        grouper.clear();
        assert!(grouper.groups().is_empty());
    }

    #[test]
    fn test_explicit_locale_identities() {
        let (catalog, prefs) = fixture();
        let resolver = LocaleResolver::new(&catalog, &prefs);
        let mut grouper = LanguageGrouper::new();

        let identities: Vec<RecipientIdentity> = vec!["es".into(), "pt".into(), "es".into()];
        let groups = grouper.group(identities.iter(), &resolver);
        let locales: Vec<_> = groups.iter().map(|g| (g.locale().as_str(), g.len())).collect();
        assert_eq!(locales, vec![("es", 2), ("pt", 1)]);
    }

    #[test]
    fn test_filters() {
        let (catalog, prefs) = fixture();
        let resolver = LocaleResolver::new(&catalog, &prefs);
        let players = vec![
            player(0, 1, Some(1), PermissionLevel::Admin),
            player(1, 1, Some(2), PermissionLevel::Member),
            player(2, 2, None, PermissionLevel::Moderator),
            player(3, 1, Some(1), PermissionLevel::Helper),
        ];
        let mut grouper = LanguageGrouper::new();

        let team = grouper.group_team(&players, &resolver, TeamId(1));
        assert_eq!(team.iter().map(LanguageGroup::len).sum::<usize>(), 3);

        let squad = grouper.group_squad(&players, &resolver, TeamId(1), SquadId(1));
        assert_eq!(
            summary(squad),
            vec![("en".to_string(), vec![0]), ("fr".to_string(), vec![3])]
        );

        let staff = grouper.group_min_permission(&players, &resolver, PermissionLevel::Moderator);
        assert_eq!(summary(staff), vec![("en".to_string(), vec![0, 2])]);

        let others = grouper.group_except(&players, &resolver, RecipientId(1));
        assert_eq!(
            summary(others),
            vec![("en".to_string(), vec![0, 2]), ("fr".to_string(), vec![3])]
        );
    }

    #[test]
    fn test_grouper_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<LanguageGrouper<RecipientId>>();
    }
}
