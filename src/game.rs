//! The game context: owns every object registry, the subscriber registry,
//! the main action queue, the phase system, and the resolution history.
//! This is the single mutable root the rest of the engine operates on.

use indexmap::IndexMap;

use crate::ability::{Ability, AttachedAbility, AttachedTrigger, Trigger};
use crate::actor::{Actor, ActorId};
use crate::aux::{AuxObject, AuxRegistry, PhaseCounters, PHASE_COUNTERS_KEY};
use crate::constraint::ConstraintContext;
use crate::error::{EngineError, EngineResult};
use crate::event::{ActivationArgs, Event, EventKind};
use crate::faction::{Faction, FactionId};
use crate::object::{GameObject, ObjectId, ObjectRegistry};
use crate::outcome::{EliminationPredicate, Outcome, OutcomeChecker};
use crate::phase::{Phase, PhaseSystem};
use crate::queue::{self, ActionQueue, History};
use crate::registry::SubscriberRegistry;
use crate::status::StatusValue;

/// Ability/trigger payload for one actor, as handed to [`GameBuilder`].
pub struct ActorSpec {
    name: Option<String>,
    abilities: Vec<Box<dyn Ability>>,
    triggers: Vec<Box<dyn Trigger>>,
}

impl ActorSpec {
    /// An unnamed actor with no abilities or triggers yet.
    pub fn new() -> Self {
        Self {
            name: None,
            abilities: Vec::new(),
            triggers: Vec::new(),
        }
    }

    /// Names the actor.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new()
        }
    }

    /// Attaches an ability.
    pub fn with_ability(mut self, ability: Box<dyn Ability>) -> Self {
        self.abilities.push(ability);
        self
    }

    /// Attaches a trigger.
    pub fn with_trigger(mut self, trigger: Box<dyn Trigger>) -> Self {
        self.triggers.push(trigger);
        self
    }
}

impl Default for ActorSpec {
    fn default() -> Self {
        Self::new()
    }
}

struct FactionSpec {
    name: Option<String>,
    actors: Vec<ActorSpec>,
}

/// Builds a [`Game`]: declares factions and their actors, registers extra
/// aux objects, then resolves every id and wiring in one pass.
pub struct GameBuilder {
    name: String,
    factions: Vec<FactionSpec>,
    aux: Vec<Box<dyn AuxObject>>,
}

impl GameBuilder {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            factions: Vec::new(),
            aux: Vec::new(),
        }
    }

    /// Declares a faction with its member actors.
    pub fn faction(mut self, name: impl Into<String>, actors: Vec<ActorSpec>) -> Self {
        self.factions.push(FactionSpec {
            name: Some(name.into()),
            actors,
        });
        self
    }

    /// Registers an extra aux object beyond the built-in `PhaseCounters`
    /// and `GameEnder`.
    pub fn aux_object(mut self, object: Box<dyn AuxObject>) -> Self {
        self.aux.push(object);
        self
    }

    /// Resolves every declared faction and actor into the live game,
    /// allocating object ids, attaching abilities and triggers, wiring the
    /// default two-faction elimination win condition when exactly two
    /// factions were declared, and registering `PhaseCounters` and
    /// `GameEnder`.
    pub fn build(self) -> Game {
        let mut game = Game {
            objects: ObjectRegistry::new(),
            actors: IndexMap::new(),
            factions: IndexMap::new(),
            registry: SubscriberRegistry::new(),
            aux: AuxRegistry::new(),
            phase: PhaseSystem::new(),
            main_queue: ActionQueue::new(),
            history: History::new(),
            next_seq: 1,
            name: self.name,
        };

        game.aux
            .register(Box::new(PhaseCounters::new()))
            .expect("PhaseCounters is the first aux object registered");
        game.aux
            .register(Box::new(crate::builtin::ender::GameEnder::new()))
            .expect("GameEnder is the second aux object registered");
        for object in self.aux {
            let _ = game.aux.register(object);
        }

        let mut faction_ids = Vec::new();
        for spec in self.factions {
            let faction_id = game
                .objects
                .allocate(spec.name.clone())
                .expect("faction names are author-controlled and distinct");
            let mut member_ids = Vec::new();
            for actor_spec in spec.actors {
                let actor_id = game
                    .objects
                    .allocate(actor_spec.name.clone())
                    .expect("actor names are author-controlled and distinct");
                let mut actor = Actor::new(actor_id, actor_spec.name, vec![faction_id]);
                for ability in actor_spec.abilities {
                    let ability_id = game.objects.allocate(None).expect("anonymous ids never collide");
                    actor.attach_ability(AttachedAbility::new(ability_id, ability));
                }
                for trigger in actor_spec.triggers {
                    let trigger_id = game.objects.allocate(None).expect("anonymous ids never collide");
                    let interests = trigger.interests();
                    let attached = AttachedTrigger::new(trigger_id, trigger);
                    let slot = actor.triggers().len();
                    for kind in interests {
                        let owner = actor_id;
                        game.registry.register(
                            kind,
                            trigger_id,
                            std::rc::Rc::new(move |game: &Game, event: &Event| {
                                let actor = match game.actor(owner) {
                                    Some(actor) => actor,
                                    None => return Vec::new(),
                                };
                                let trigger = match actor.triggers().get(slot) {
                                    Some(trigger) => trigger,
                                    None => return Vec::new(),
                                };
                                trigger.inner().on_event(game, owner, event)
                            }),
                        );
                    }
                    actor.attach_trigger(attached);
                }
                member_ids.push(actor_id);
                game.actors.insert(actor_id, actor);
            }
            game.factions
                .insert(faction_id, Faction::new(faction_id, spec.name, member_ids));
            faction_ids.push(faction_id);
        }

        if faction_ids.len() == 2 {
            let (a, b) = (faction_ids[0], faction_ids[1]);
            if let Some(faction) = game.factions.get_mut(&a) {
                faction.attach_outcome_checker(OutcomeChecker::new(
                    a,
                    a,
                    Box::new(EliminationPredicate { watched: b, outcome: Outcome::Victory }),
                ));
                faction.attach_outcome_checker(OutcomeChecker::new(
                    a,
                    a,
                    Box::new(EliminationPredicate { watched: a, outcome: Outcome::Defeat }),
                ));
            }
            if let Some(faction) = game.factions.get_mut(&b) {
                faction.attach_outcome_checker(OutcomeChecker::new(
                    b,
                    b,
                    Box::new(EliminationPredicate { watched: a, outcome: Outcome::Victory }),
                ));
                faction.attach_outcome_checker(OutcomeChecker::new(
                    b,
                    b,
                    Box::new(EliminationPredicate { watched: b, outcome: Outcome::Defeat }),
                ));
            }
        }

        game
    }
}

/// The live game context.
pub struct Game {
    objects: ObjectRegistry,
    actors: IndexMap<ActorId, Actor>,
    factions: IndexMap<FactionId, Faction>,
    registry: SubscriberRegistry,
    aux: AuxRegistry,
    phase: PhaseSystem,
    main_queue: ActionQueue,
    history: History,
    next_seq: u64,
    name: String,
}

impl Game {
    /// Starts building a game named `name`.
    pub fn builder(name: impl Into<String>) -> GameBuilder {
        GameBuilder::new(name)
    }

    /// The game's name, as given to `Game::builder`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current phase progression state.
    pub fn phase(&self) -> &PhaseSystem {
        &self.phase
    }

    /// The flat resolution history.
    pub fn history(&self) -> &History {
        &self.history
    }

    pub(crate) fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    /// Looks up an actor by id.
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// Looks up a faction by id.
    pub fn faction(&self, id: FactionId) -> Option<&Faction> {
        self.factions.get(&id)
    }

    /// Every faction currently in the game.
    pub fn factions(&self) -> impl Iterator<Item = &Faction> {
        self.factions.values()
    }

    /// The registered aux objects.
    pub fn aux(&self) -> &AuxRegistry {
        &self.aux
    }

    /// The per-phase usage counters backing `LimitPerPhase*` constraints.
    pub fn phase_counters(&self) -> &PhaseCounters {
        self.aux
            .get_typed::<PhaseCounters>(PHASE_COUNTERS_KEY)
            .expect("GameBuilder::build always registers PhaseCounters")
    }

    pub(crate) fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Dispatches `event` to every matching trigger, aux object, and
    /// faction outcome checker, in that order, and returns the actions
    /// they produced.
    pub(crate) fn dispatch(&self, event: &Event) -> Vec<(ObjectId, crate::event::ActionSpec)> {
        let mut results = self.registry.dispatch(self, event);

        let keys = event.dispatch_keys();
        for aux in self.aux.iter() {
            if aux.interests().iter().any(|kind| keys.contains(kind)) {
                let owner = ObjectId::new(0);
                results.extend(aux.on_event(self, event).into_iter().map(|spec| (owner, spec)));
            }
        }

        if keys.contains(&EventKind::PostAction) {
            for faction in self.factions.values() {
                for checker in faction.outcome_checkers() {
                    results.extend(
                        checker
                            .on_event(self)
                            .into_iter()
                            .map(|spec| (checker.id(), spec)),
                    );
                }
            }
        }

        results
    }

    /// Writes `value` under `key` on `actor`'s status bag and emits
    /// `EStatusChange`, resolving anything it triggers before returning.
    /// Emitted unconditionally, even when `value` equals what was already
    /// there — a trigger watching `StatusChange` must see every write, not
    /// just ones that change the stored value.
    pub fn set_status(&mut self, actor: ActorId, key: &str, value: StatusValue) -> EngineResult<()> {
        if !self.actors.contains_key(&actor) {
            return Err(EngineError::UnknownActor(actor.raw()));
        }
        let old = self
            .actors
            .get_mut(&actor)
            .expect("presence just checked")
            .status_mut()
            .write(key, value.clone());
        let new = Some(value);
        queue::emit(
            self,
            Event::StatusChange {
                actor,
                key: key.to_string(),
                old,
                new,
            },
        );
        Ok(())
    }

    /// Records `outcome` for `faction` on every member's status bag and
    /// emits `EOutcomeAchieved`. Called by `OutcomeAction::run`.
    pub(crate) fn record_outcome(&mut self, faction: FactionId, outcome: Outcome) {
        let members = match self.factions.get(&faction) {
            Some(faction) => faction.members().to_vec(),
            None => return,
        };
        for member in members {
            let _ = self.set_status(member, "outcome", StatusValue::Outcome(outcome));
        }
        queue::emit(self, Event::OutcomeAchieved { faction, outcome });
    }

    /// Forces the phase to `shutdown` and emits `EGameEnded`. Called by
    /// `EndTheGameAction::run`; idempotent, so a second call after the game
    /// has already ended is a no-op.
    pub(crate) fn shutdown(&mut self) {
        if self.phase.has_ended() {
            return;
        }
        let from = self.phase.current().name().to_string();
        if self.phase.set_to(crate::phase::SHUTDOWN).is_err() {
            return;
        }
        queue::emit(
            self,
            Event::PhaseChange {
                from,
                to: crate::phase::SHUTDOWN.to_string(),
            },
        );
        queue::emit(self, Event::GameEnded);
    }

    /// Activates `ability` on `actor` with `args`. Emits `EActivate`
    /// unconditionally, then checks the ability's constraints; on success
    /// the produced actions are enqueued and, if the active phase resolves
    /// instantly, drained before returning. Returns the veto reason
    /// (wrapped in `InvalidActivation`) if a constraint rejected it.
    ///
    /// A no-op once the game has ended, per the engine's end-idempotence
    /// guarantee.
    pub fn activate(&mut self, actor: ActorId, ability: &str, args: ActivationArgs) -> EngineResult<()> {
        if self.phase.has_ended() {
            return Ok(());
        }

        let ability_id = self
            .actors
            .get(&actor)
            .and_then(|a| a.ability(ability))
            .map(|attached| attached.id())
            .ok_or_else(|| EngineError::UnknownAbility(actor.raw(), ability.to_string()))?;

        queue::emit(
            self,
            Event::Activate {
                ability: ability_id,
                args: args.clone(),
            },
        );

        let actor_ref = self
            .actors
            .get(&actor)
            .ok_or(EngineError::UnknownActor(actor.raw()))?;
        let attached = actor_ref
            .ability(ability)
            .ok_or_else(|| EngineError::UnknownAbility(actor.raw(), ability.to_string()))?;

        let ctx = ConstraintContext {
            owner: actor,
            target: args.target(),
            attachment: ability,
        };
        let usage_keys: Vec<String> = attached
            .constraints()
            .iter()
            .filter_map(|constraint| constraint.usage_key(&ctx))
            .collect();

        let specs = attached
            .activate(self, actor, &args)
            .map_err(EngineError::InvalidActivation)?;

        for key in usage_keys {
            self.phase_counters().increment(&key);
        }

        for spec in specs {
            let seq = self.next_seq();
            self.main_queue
                .push_action(crate::event::Action::new(seq, spec));
        }

        if self.phase.current().policy() == crate::phase::ResolutionPolicy::Instant {
            self.drain_main_queue();
        }

        Ok(())
    }

    /// Advances to the next phase in the default cyclic progression,
    /// first draining whatever has accumulated in the main queue (relevant
    /// when the outgoing phase was `EndOfPhase`), then emitting
    /// `EPhaseChange`.
    pub fn advance_phase(&mut self) -> EngineResult<Phase> {
        self.drain_main_queue();
        let from = self.phase.current().name().to_string();
        let next = self.phase.advance()?;
        queue::emit(
            self,
            Event::PhaseChange {
                from,
                to: next.name().to_string(),
            },
        );
        Ok(next)
    }

    fn drain_main_queue(&mut self) {
        let mut queue = std::mem::take(&mut self.main_queue);
        queue::drain(&mut queue, self);
        self.main_queue = queue;
    }
}
