use game_core::{
    InputDevice, Key, MouseButton, PotionKind, Position, ScreenPoint, SkillId,
};

use crate::world::{InputAction, PICKUP_REACH, SimWorld, WorldState};

impl InputDevice for SimWorld {
    fn press_key(&self, key: Key) {
        let mut state = self.state();
        state.record(InputAction::Key(key));
        if !state.unresponsive {
            state.apply_key(key);
        }
    }

    fn key_down(&self, key: Key) {
        let mut state = self.state();
        state.record(InputAction::KeyDown(key));
        state.held.insert(key);
    }

    fn key_up(&self, key: Key) {
        let mut state = self.state();
        state.record(InputAction::KeyUp(key));
        state.held.remove(&key);
    }

    fn click(&self, point: ScreenPoint, button: MouseButton, modifier: Option<Key>) {
        let mut state = self.state();
        state.record(InputAction::Click {
            point,
            button,
            modifier,
        });
        state.pointer = point;
        if state.unresponsive {
            return;
        }
        let target = to_world(point);
        match button {
            MouseButton::Left => {
                let stand_still = modifier.is_some()
                    || state.held.contains(&state.snapshot.key_bindings.stand_still);
                state.left_click(target, stand_still)
            }
            MouseButton::Right => state.right_click(target),
        }
    }

    fn move_pointer(&self, point: ScreenPoint) {
        let mut state = self.state();
        state.record(InputAction::Pointer(point));
        state.pointer = point;
    }

    fn release_all(&self) {
        let mut state = self.state();
        state.record(InputAction::ReleaseAll);
        state.held.clear();
    }
}

/// Inverse of the identity screen projection used by the sim pathfinder.
fn to_world(point: ScreenPoint) -> Position {
    Position::new(point.x, point.y)
}

impl WorldState {
    fn apply_key(&mut self, key: Key) {
        let bindings = &self.snapshot.key_bindings;
        if key == bindings.force_move {
            let target = to_world(self.pointer);
            self.walk_to(target);
            return;
        }
        if key == bindings.swap_weapons {
            let player = &mut self.snapshot.player;
            player.weapon_set = player.weapon_set.other();
            return;
        }
        if key == bindings.close_menus {
            self.snapshot.menus = Default::default();
            return;
        }
        if let Some(skill) = bindings
            .skills
            .iter()
            .find(|(_, bound)| **bound == key)
            .map(|(skill, _)| *skill)
        {
            self.snapshot.player.right_skill = skill;
            return;
        }
        self.drink(key);
    }

    fn drink(&mut self, key: Key) {
        let Some(slot) = self
            .snapshot
            .belt
            .slots
            .iter_mut()
            .find(|slot| slot.key == key && slot.count > 0)
        else {
            return;
        };
        slot.count -= 1;
        let kind = slot.kind;

        let player = &mut self.snapshot.player;
        let (life, mana) = (&mut player.life, &mut player.mana);
        match kind {
            PotionKind::Healing => life.current = (life.current + life.maximum / 2).min(life.maximum),
            PotionKind::Mana => mana.current = (mana.current + mana.maximum / 2).min(mana.maximum),
            PotionKind::Rejuvenation => {
                life.current = life.maximum;
                mana.current = mana.maximum;
            }
        }
    }

    fn left_click(&mut self, target: Position, stand_still: bool) {
        if let Some(monster) = self.monster_at(target) {
            self.hit(monster);
            return;
        }
        if let Some(object) = self
            .snapshot
            .objects
            .iter()
            .find(|o| o.position == target && o.selectable)
            .map(|o| o.id)
        {
            self.interact(object);
            return;
        }
        if let Some(item) = self
            .snapshot
            .items
            .iter()
            .find(|i| i.position == target)
            .map(|i| i.id)
        {
            if self.snapshot.distance_from_me(target) <= PICKUP_REACH {
                self.pick_up(item);
            }
            return;
        }
        if !stand_still {
            self.walk_to(target);
        }
    }

    fn right_click(&mut self, target: Position) {
        let skill = self.snapshot.player.right_skill;
        match skill {
            SkillId::TELEPORT => self.teleport_to(target),
            SkillId::TELEKINESIS => {
                let item = self
                    .snapshot
                    .items
                    .iter()
                    .find(|i| i.position == target)
                    .map(|i| i.id);
                if let Some(item) = item {
                    self.pick_up(item);
                }
            }
            _ if target == self.snapshot.player.position => {
                if let Some(states) = self.grants.get(&skill).copied() {
                    self.snapshot.player.states |= states;
                }
            }
            _ => {
                if let Some(monster) = self.monster_at(target) {
                    self.hit(monster);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units;
    use game_core::{Belt, BeltSlot, PlayerStates, ResourceMeter, UnitId};

    #[test]
    fn test_force_move_walks_to_the_pointer() {
        let world = SimWorld::builder(10, 10).build();
        let force_move = world.snapshot().key_bindings.force_move;
        world.move_pointer(ScreenPoint::new(3, 4));
        world.press_key(force_move);
        assert_eq!(world.snapshot().player.position, Position::new(3, 4));
    }

    #[test]
    fn test_clicks_damage_monsters_unless_invulnerable() {
        let world = SimWorld::builder(10, 10)
            .monster(units::monster(5, Position::new(2, 2), 100))
            .monster(units::monster(6, Position::new(3, 3), 100))
            .build();
        world.make_invulnerable(UnitId(6));

        world.click(ScreenPoint::new(2, 2), MouseButton::Left, None);
        world.click(ScreenPoint::new(3, 3), MouseButton::Right, None);

        let snapshot = world.snapshot();
        assert!(snapshot.monster(UnitId(5)).unwrap().life.current < 100);
        assert_eq!(snapshot.monster(UnitId(6)).unwrap().life.current, 100);
    }

    #[test]
    fn test_skill_keys_select_the_right_skill_and_buff_self() {
        let world = SimWorld::builder(10, 10)
            .bind_skill(SkillId::BATTLE_ORDERS, Key::F(5))
            .build();
        world.press_key(Key::F(5));
        world.click(ScreenPoint::new(0, 0), MouseButton::Right, None);

        let player = world.snapshot().player;
        assert_eq!(player.right_skill, SkillId::BATTLE_ORDERS);
        assert!(player.has_state(PlayerStates::BATTLE_ORDERS));
    }

    #[test]
    fn test_belt_keys_drink_potions() {
        let world = SimWorld::builder(4, 4)
            .with(|s| {
                s.player.life = ResourceMeter::new(20, 100);
                s.belt = Belt {
                    slots: vec![BeltSlot {
                        kind: PotionKind::Healing,
                        key: Key::Char('1'),
                        count: 2,
                    }],
                };
            })
            .build();

        world.press_key(Key::Char('1'));
        let snapshot = world.snapshot();
        assert_eq!(snapshot.player.life.current, 70);
        assert_eq!(snapshot.belt.count(PotionKind::Healing), 1);
    }

    #[test]
    fn test_release_all_clears_held_keys() {
        let world = SimWorld::builder(4, 4).build();
        world.key_down(Key::Shift);
        assert_eq!(world.held_keys(), vec![Key::Shift]);
        world.release_all();
        assert!(world.held_keys().is_empty());
        assert_eq!(world.actions().last(), Some(&InputAction::ReleaseAll));
    }
}
