use chrono::NaiveDate;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use sqlx::SqlitePool;

use crate::db::operations::content::{self, VocabItem};
use crate::db::operations::learning;
use crate::db::operations::ContentKind;

/// The fixed study set for `today`, at most `limit` words.
///
/// The first call of a day selects candidates and persists them as the
/// day's assignment; every later call resolves the persisted rows instead,
/// so the set never re-rolls. Returned in content-id order.
pub async fn todays_words<R>(
    pool: &SqlitePool,
    today: NaiveDate,
    limit: usize,
    rng: &mut R,
) -> Result<Vec<VocabItem>, sqlx::Error>
where
    R: Rng + ?Sized,
{
    let existing = learning::assigned_content_ids(pool, today, ContentKind::Word).await?;
    if !existing.is_empty() {
        return content::words_by_ids(pool, &existing).await;
    }

    let user_new = content::unlearned_words(pool, true).await?;
    let regular_new = if user_new.len() < limit {
        content::unlearned_words(pool, false).await?
    } else {
        Vec::new()
    };
    let full_set = if user_new.len() + regular_new.len() < limit {
        content::all_words(pool).await?
    } else {
        Vec::new()
    };

    let picked = select_assignment(&user_new, &regular_new, &full_set, limit, rng);
    if picked.is_empty() {
        return Ok(Vec::new());
    }

    learning::persist_assignment(pool, today, ContentKind::Word, &picked).await?;

    // Read back what actually won; a raced concurrent caller may have
    // persisted its set first.
    let assigned = learning::assigned_content_ids(pool, today, ContentKind::Word).await?;
    content::words_by_ids(pool, &assigned).await
}

/// Tiered candidate selection:
///
/// 1. unlearned user-added words, sampled at random;
/// 2. unlearned corpus words filling the remainder;
/// 3. if still short, the history filter is dropped entirely and the quota
///    is refilled from the full set, user-added first, random within each
///    group. This tier may reintroduce already-learned words when the
///    corpus is smaller than `limit` or fully learned.
///
/// Tiers 1 and 2 are disjoint by construction; tier 3 replaces rather than
/// extends, so the result never contains duplicate ids.
pub fn select_assignment<R>(
    user_new: &[VocabItem],
    regular_new: &[VocabItem],
    full_set: &[VocabItem],
    limit: usize,
    rng: &mut R,
) -> Vec<i64>
where
    R: Rng + ?Sized,
{
    if limit == 0 {
        return Vec::new();
    }

    let mut picked: Vec<i64> = user_new
        .choose_multiple(rng, limit.min(user_new.len()))
        .map(|w| w.id)
        .collect();

    if picked.len() < limit {
        let remainder = limit - picked.len();
        picked.extend(
            regular_new
                .choose_multiple(rng, remainder.min(regular_new.len()))
                .map(|w| w.id),
        );
    }

    if picked.len() < limit {
        let mut user_added: Vec<i64> = full_set
            .iter()
            .filter(|w| w.is_user_added)
            .map(|w| w.id)
            .collect();
        let mut rest: Vec<i64> = full_set
            .iter()
            .filter(|w| !w.is_user_added)
            .map(|w| w.id)
            .collect();
        user_added.shuffle(rng);
        rest.shuffle(rng);
        picked = user_added.into_iter().chain(rest).take(limit).collect();
    }

    picked
}
