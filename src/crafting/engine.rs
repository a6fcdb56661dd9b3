//! The crafting engine: recipe catalog plus a timed job queue.
//!
//! Jobs move `Queued → Ready → Collected`, or `Queued → Cancelled`. The
//! host drives completion by calling [`CraftingEngine::sweep`] periodically
//! with its logical clock; the sweep compares `now >= ready_at_ms`, so late
//! or redundant ticks only delay a job, never lose it.
//!
//! `start_crafting` is all-or-nothing: every check (level, currency, each
//! ingredient) runs before anything is consumed, and a failure at any check
//! leaves the store and economy untouched.

use crate::constants::PREMIUM_COST_MS_PER_UNIT;
use crate::crafting::resolver::resolve_ingredient;
use crate::crafting::types::{
    CraftingJob, Ingredient, IngredientRefund, JobState, Recipe, RecipeCatalog, Refund,
};
use crate::economy::EconomyPort;
use crate::errors::{IngredientShortfall, InventoryError, ResourceShortfall};
use crate::events::InventoryEvent;
use crate::inventory::store::InventoryStore;
use crate::inventory::types::{InventoryItem, ItemCategory, ItemDraft};
use std::collections::BTreeMap;
use tracing::{debug, warn};
use uuid::Uuid;

/// Planned consumption of one concrete inventory entry.
struct ConsumeStep {
    category: ItemCategory,
    item_id: String,
    take: u32,
}

#[derive(Debug, Default)]
pub struct CraftingEngine {
    catalog: RecipeCatalog,
    jobs: Vec<CraftingJob>,
}

impl CraftingEngine {
    pub fn new(catalog: RecipeCatalog) -> Self {
        Self {
            catalog,
            jobs: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &RecipeCatalog {
        &self.catalog
    }

    /// Jobs still in the active queue (Queued or Ready).
    pub fn active_jobs(&self) -> &[CraftingJob] {
        &self.jobs
    }

    pub fn job(&self, job_id: &str) -> Option<&CraftingJob> {
        self.jobs.iter().find(|job| job.id == job_id)
    }

    /// Replaces the queue, e.g. when loading a save. Terminal jobs that
    /// leaked into the blob are dropped.
    pub fn restore_queue(&mut self, jobs: Vec<CraftingJob>) {
        self.jobs = jobs
            .into_iter()
            .filter(|job| matches!(job.state, JobState::Queued | JobState::Ready))
            .collect();
    }

    pub fn queue_snapshot(&self) -> Vec<CraftingJob> {
        self.jobs.clone()
    }

    /// Validates affordability and, only if every check passes, consumes
    /// ingredients and currency and enqueues a new job.
    pub fn start_crafting(
        &mut self,
        recipe_id: &str,
        now_ms: u64,
        store: &mut InventoryStore,
        economy: &mut dyn EconomyPort,
    ) -> Result<CraftingJob, InventoryError> {
        let recipe = self
            .catalog
            .get(recipe_id)
            .cloned()
            .ok_or_else(|| InventoryError::NotFound(format!("recipe '{recipe_id}'")))?;

        if economy.level() < recipe.result.unlock_level {
            return Err(InventoryError::IllegalState(format!(
                "recipe '{recipe_id}' unlocks at level {} (player is {})",
                recipe.result.unlock_level,
                economy.level()
            )));
        }
        if economy.money() < recipe.cost {
            return Err(InventoryError::InsufficientResource(
                ResourceShortfall::Money {
                    required: recipe.cost,
                    available: economy.money(),
                },
            ));
        }

        let plan = Self::plan_consumption(store, &recipe)?;

        // All checks passed; apply in an order that cannot half-fail.
        if !economy.spend_money(recipe.cost) {
            return Err(InventoryError::InsufficientResource(
                ResourceShortfall::Money {
                    required: recipe.cost,
                    available: economy.money(),
                },
            ));
        }
        for step in plan {
            store.remove_item(step.category, &step.item_id, step.take)?;
        }

        let job = CraftingJob {
            id: Uuid::new_v4().to_string(),
            recipe_id: recipe.id.clone(),
            started_at_ms: now_ms,
            ready_at_ms: now_ms + recipe.craft_duration_ms,
            state: JobState::Queued,
        };
        self.jobs.push(job.clone());
        store.touch();
        store.emit(InventoryEvent::CraftingStarted {
            job_id: job.id.clone(),
            recipe_id: recipe.id,
            ready_at_ms: job.ready_at_ms,
        });
        debug!(job = %job.id, ready_at_ms = job.ready_at_ms, "crafting started");
        Ok(job)
    }

    /// Transitions every due Queued job to Ready. Idempotent; safe to call
    /// late or several times for the same interval. Returns how many jobs
    /// became Ready.
    pub fn sweep(&mut self, now_ms: u64, store: &mut InventoryStore) -> usize {
        let mut ready = Vec::new();
        for job in &mut self.jobs {
            if job.state == JobState::Queued && now_ms >= job.ready_at_ms {
                job.state = JobState::Ready;
                ready.push((job.id.clone(), job.recipe_id.clone()));
            }
        }
        if !ready.is_empty() {
            store.touch();
        }
        let count = ready.len();
        for (job_id, recipe_id) in ready {
            store.emit(InventoryEvent::CraftingReady { job_id, recipe_id });
        }
        count
    }

    /// Deposits a Ready job's result into the store and retires the job.
    pub fn collect_crafting(
        &mut self,
        job_id: &str,
        store: &mut InventoryStore,
    ) -> Result<InventoryItem, InventoryError> {
        let index = self.job_index(job_id)?;
        if self.jobs[index].state != JobState::Ready {
            return Err(InventoryError::IllegalState(format!(
                "job '{job_id}' is {:?}, not ready",
                self.jobs[index].state
            )));
        }
        let recipe_id = self.jobs[index].recipe_id.clone();
        let recipe = self
            .catalog
            .get(&recipe_id)
            .cloned()
            .ok_or_else(|| InventoryError::NotFound(format!("recipe '{recipe_id}'")))?;
        let template = &recipe.result;
        let category = ItemCategory::from_kind(&template.kind).ok_or_else(|| {
            InventoryError::IllegalState(format!("result kind '{}' has no category", template.kind))
        })?;

        let quantity = if store.schema().is_stackable(category) {
            template.quantity.max(1)
        } else {
            1
        };
        // The whole result must fit; otherwise leave the job Ready so it
        // can be collected again once space is freed
        if store.stack_room(category, &template.id) < quantity {
            return Err(InventoryError::CapacityExceeded(category));
        }

        let draft = ItemDraft {
            id: Self::fresh_item_id(store, &template.id),
            name: template.name.clone(),
            definition_id: Some(template.id.clone()),
            description: template.description.clone(),
            rarity: Some(template.rarity),
            cost: template.cost,
            unlock_level: template.unlock_level,
            ..Default::default()
        };
        let (_, deposited) = store.add_item_traced(category, draft, quantity)?;
        let Some(item_id) = deposited else {
            return Err(InventoryError::CapacityExceeded(category));
        };
        let item = store
            .find_item(category, &item_id)
            .cloned()
            .ok_or_else(|| {
                InventoryError::IllegalState(format!(
                    "deposited item '{item_id}' missing from store"
                ))
            })?;

        self.jobs[index].state = JobState::Collected;
        self.jobs.remove(index);
        store.touch();
        store.emit(InventoryEvent::CraftingCompleted {
            job_id: job_id.to_string(),
            recipe_id,
            item_id: item.id.clone(),
        });
        Ok(item)
    }

    /// Forces a Queued job to Ready immediately.
    ///
    /// Already-Ready jobs succeed at no cost. Otherwise premium currency is
    /// required: one gem per started minute remaining. An insufficient gem
    /// balance fails without mutating anything; the caller still collects
    /// explicitly afterwards.
    pub fn instant_complete(
        &mut self,
        job_id: &str,
        pay_with_premium: bool,
        now_ms: u64,
        store: &mut InventoryStore,
        economy: &mut dyn EconomyPort,
    ) -> Result<(), InventoryError> {
        let index = self.job_index(job_id)?;
        if self.jobs[index].state == JobState::Ready {
            return Ok(());
        }
        if !pay_with_premium {
            return Err(InventoryError::IllegalState(format!(
                "job '{job_id}' is not ready and no premium payment was offered"
            )));
        }
        let remaining_ms = self.jobs[index].ready_at_ms.saturating_sub(now_ms);
        let cost = remaining_ms.div_ceil(PREMIUM_COST_MS_PER_UNIT);
        if economy.gems() < cost {
            return Err(InventoryError::InsufficientResource(
                ResourceShortfall::Gems {
                    required: cost,
                    available: economy.gems(),
                },
            ));
        }
        if !economy.spend_gems(cost) {
            return Err(InventoryError::InsufficientResource(
                ResourceShortfall::Gems {
                    required: cost,
                    available: economy.gems(),
                },
            ));
        }
        let job = &mut self.jobs[index];
        job.ready_at_ms = now_ms;
        job.state = JobState::Ready;
        store.touch();
        store.emit(InventoryEvent::CraftingInstantCompleted {
            job_id: job_id.to_string(),
            gems_spent: cost,
        });
        Ok(())
    }

    /// Cancels a Queued job, refunding a fraction of its cost and
    /// ingredients. Refunded ingredients are freshly created units, not the
    /// originally consumed instances.
    pub fn cancel_crafting(
        &mut self,
        job_id: &str,
        refund_fraction: f64,
        store: &mut InventoryStore,
        economy: &mut dyn EconomyPort,
    ) -> Result<Refund, InventoryError> {
        let index = self.job_index(job_id)?;
        if self.jobs[index].state != JobState::Queued {
            return Err(InventoryError::IllegalState(format!(
                "job '{job_id}' is {:?}; only queued jobs can be cancelled",
                self.jobs[index].state
            )));
        }
        let recipe_id = self.jobs[index].recipe_id.clone();
        let recipe = self
            .catalog
            .get(&recipe_id)
            .cloned()
            .ok_or_else(|| InventoryError::NotFound(format!("recipe '{recipe_id}'")))?;
        let fraction = refund_fraction.clamp(0.0, 1.0);

        let money = (recipe.cost as f64 * fraction).floor() as u64;
        economy.add_money(money);
        let mut ingredients = Vec::new();
        for ingredient in &recipe.ingredients {
            let quantity = (f64::from(ingredient.quantity) * fraction).floor() as u32;
            if quantity == 0 {
                continue;
            }
            self.deposit_refund(store, ingredient, quantity);
            ingredients.push(IngredientRefund {
                id: ingredient.id.clone(),
                quantity,
            });
        }

        self.jobs[index].state = JobState::Cancelled;
        self.jobs.remove(index);
        store.touch();
        store.emit(InventoryEvent::CraftingCancelled {
            job_id: job_id.to_string(),
            recipe_id,
            refund_money: money,
        });
        Ok(Refund { money, ingredients })
    }

    /// Resolves every ingredient up front. Either the full consumption plan
    /// or the complete shortfall list, never a partial mix.
    ///
    /// Fuzzy tiers of different ingredients can match the same entry (one
    /// row keyed by id, another by that item's name), so units claimed by
    /// an earlier ingredient are reserved and not offered to later ones.
    fn plan_consumption(
        store: &InventoryStore,
        recipe: &Recipe,
    ) -> Result<Vec<ConsumeStep>, InventoryError> {
        let mut plan: Vec<ConsumeStep> = Vec::new();
        let mut reserved: BTreeMap<(ItemCategory, String), u32> = BTreeMap::new();
        let mut shortfalls = Vec::new();
        for ingredient in &recipe.ingredients {
            let Some(resolved) = resolve_ingredient(store, ingredient) else {
                shortfalls.push(IngredientShortfall {
                    kind: ingredient.kind.clone(),
                    id: ingredient.id.clone(),
                    required: ingredient.quantity,
                    available: 0,
                });
                continue;
            };
            let mut remaining = ingredient.quantity;
            let mut available = 0;
            let mut steps = Vec::new();
            for entry in &resolved.entries {
                let claimed = reserved
                    .get(&(entry.category, entry.item_id.clone()))
                    .copied()
                    .unwrap_or(0);
                let free = entry.quantity.saturating_sub(claimed);
                available += free;
                if remaining == 0 || free == 0 {
                    continue;
                }
                let take = remaining.min(free);
                remaining -= take;
                steps.push(ConsumeStep {
                    category: entry.category,
                    item_id: entry.item_id.clone(),
                    take,
                });
            }
            if remaining > 0 {
                shortfalls.push(IngredientShortfall {
                    kind: ingredient.kind.clone(),
                    id: ingredient.id.clone(),
                    required: ingredient.quantity,
                    available,
                });
            } else {
                for step in &steps {
                    *reserved
                        .entry((step.category, step.item_id.clone()))
                        .or_insert(0) += step.take;
                }
                plan.extend(steps);
            }
        }
        if shortfalls.is_empty() {
            Ok(plan)
        } else {
            Err(InventoryError::InsufficientResource(
                ResourceShortfall::Ingredients(shortfalls),
            ))
        }
    }

    /// Creates refunded units back into the store. Refunds are best-effort:
    /// a full category drops the units with a warning rather than failing
    /// the cancellation.
    fn deposit_refund(&self, store: &mut InventoryStore, ingredient: &Ingredient, quantity: u32) {
        let category =
            ItemCategory::from_kind(&ingredient.kind).unwrap_or(ItemCategory::Material);
        let name = ingredient
            .name
            .clone()
            .unwrap_or_else(|| ingredient.id.clone());
        let draft = ItemDraft {
            id: Self::fresh_item_id(store, &ingredient.id),
            name,
            definition_id: Some(ingredient.id.clone()),
            ..Default::default()
        };
        if let Err(err) = store.add_item(category, draft, quantity) {
            warn!(
                ingredient = %ingredient.id,
                quantity,
                %err,
                "could not return refunded ingredient to inventory"
            );
        }
    }

    /// Picks an id that will not collide with an existing entry. The stack
    /// merge path keys on `definition_id`, so the suffix only appears on
    /// genuinely new entries.
    fn fresh_item_id(store: &InventoryStore, base: &str) -> String {
        if store.find_anywhere(base).is_none() {
            base.to_string()
        } else {
            format!("{base}_{}", Uuid::new_v4())
        }
    }

    fn job_index(&self, job_id: &str) -> Result<usize, InventoryError> {
        self.jobs
            .iter()
            .position(|job| job.id == job_id)
            .ok_or_else(|| InventoryError::NotFound(format!("job '{job_id}'")))
    }
}
