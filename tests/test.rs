#[cfg(test)]
mod test {
    use skiplists::*;

    use rand::rngs::mock::StepRng;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use std::cmp::{min, Ordering};
    use std::fmt::Debug;

    fn check<T, R>(list: &IndexedList<T, R>, expected: &[T])
        where T: PartialEq + Clone + Debug
    {
        list.check();
        assert!(list.eq_list(expected));

        assert_eq!(list.to_vec(), expected);
        assert_eq!(list.len(), expected.len());
        assert_eq!(list.is_empty(), expected.is_empty());

        let backwards: Vec<T> = list.iter().rev().cloned().collect();
        let mut reversed = expected.to_vec();
        reversed.reverse();
        assert_eq!(backwards, reversed);

        for (i, item) in expected.iter().enumerate() {
            assert_eq!(list.at(i).unwrap(), item);
        }
        assert_eq!(list.at(expected.len()), Err(Error::OutOfRange { index: expected.len(), len: expected.len() }));
    }

    fn seeded<T>(seed: u64) -> IndexedList<T> {
        IndexedList::with_rng(Options::new(0.5, 6), SmallRng::seed_from_u64(seed))
    }

    #[test]
    fn sanity() {
        let list = IndexedList::<u8>::new();
        assert!(list.eq_list(&[]));
        assert!(!list.eq_list(&[1]));
        check(&list, &[]);

        let list = IndexedList::from_slice(&[1u8, 2, 3, 4]);
        assert!(list.eq_list(&[1, 2, 3, 4]));
        assert!(!list.eq_list(&[1, 2, 3, 5]));
        assert!(!list.eq_list(&[1, 2, 3]));
        check(&list, &[1, 2, 3, 4]);

        let clone = list.clone();
        check(&clone, &[1, 2, 3, 4]);
        assert_eq!(clone, list);
    }

    #[test]
    fn empty_list_has_no_contents() {
        let mut list = IndexedList::<u8>::new();
        check(&list, &[]);
        assert_eq!(list.level(), 0);
        assert_eq!(list.first(), None);
        assert_eq!(list.pop_front(), None);
        assert_eq!(list.begin(), list.end());

        list.erase_range(0..0).unwrap();
        check(&list, &[]);
    }

    #[test]
    fn insert_at_location() {
        let mut list = seeded::<u8>(1);

        list.insert(0, 1).unwrap();
        check(&list, &[1]);

        list.insert(0, 2).unwrap();
        check(&list, &[2, 1]);

        list.insert(2, 3).unwrap();
        check(&list, &[2, 1, 3]);

        list.insert(1, 4).unwrap();
        check(&list, &[2, 4, 1, 3]);

        assert_eq!(list.insert(9, 5), Err(Error::OutOfRange { index: 9, len: 5 }));
        check(&list, &[2, 4, 1, 3]);

        list.push_front(7);
        list.push_back(8);
        check(&list, &[7, 2, 4, 1, 3, 8]);
    }

    #[test]
    fn simple_edits() {
        let mut list = IndexedList::from_slice(&[1u8, 2, 3, 4]);

        list.erase_range(1..3).unwrap();
        check(&list, &[1, 4]);

        assert_eq!(list.erase_index(1), Ok(4));
        check(&list, &[1]);

        *list.at_mut(0).unwrap() = 9;
        check(&list, &[9]);

        list.resize(3, 5);
        check(&list, &[9, 5, 5]);
        list.resize(1, 0);
        check(&list, &[9]);
    }

    #[test]
    fn unique_sorted_map() {
        let mut map = SkipMap::new();
        for &k in &[5, 3, 8, 1, 4] {
            let (_, inserted) = map.insert((k, format!("v{}", k)));
            assert!(inserted);
        }
        map.check();

        let pos = map.find(&8).unwrap();
        assert_eq!(map.at_position(&pos), Some(&(8, "v8".to_string())));
        assert_eq!(map.get_value(&8).map(|v| v.as_str()), Some("v8"));
        assert_eq!(map.keys().cloned().collect::<Vec<_>>(), vec![1, 3, 4, 5, 8]);
        assert!(map.find(&7).is_none());

        // Duplicate keys are refused and the first value stays.
        let (pos, inserted) = map.insert((3, "other".to_string()));
        assert!(!inserted);
        assert_eq!(pos.index(), 1);
        assert_eq!(map.get_value(&3).map(|v| v.as_str()), Some("v3"));
        assert_eq!(map.len(), 5);

        let (_, old) = map.replace((3, "new".to_string()));
        assert_eq!(old, Some((3, "v3".to_string())));
        *map.get_value_mut(&4).unwrap() = "four".to_string();
        assert_eq!(map.values().map(|v| v.as_str()).collect::<Vec<_>>(), vec!["v1", "new", "four", "v5", "v8"]);
        map.check();
    }

    #[test]
    fn positional_access_on_a_multiset() {
        let mut set: MultiSkipSet<u32> = vec![10, 20, 30, 40].into_iter().collect();
        assert_eq!(set.at(2), Ok(&30));
        assert_eq!(set.erase_index(0), Ok(10));
        assert_eq!(set.at(0), Ok(&20));
        assert_eq!(set.len(), 3);
        set.check();

        let mut list = IndexedList::from_slice(&[10, 20, 30, 40]);
        assert_eq!(list.at(2), Ok(&30));
        list.erase_index(0).unwrap();
        assert_eq!(list.at(0), Ok(&20));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn cut_and_splice_back() {
        let mut list = IndexedList::from_slice(&[10, 20, 30, 40, 50]);
        let mut run = list.cut(1..3).unwrap();
        check(&list, &[10, 40, 50]);
        check(&run, &[20, 30]);

        list.splice(1, &mut run).unwrap();
        check(&list, &[10, 20, 30, 40, 50]);
        check(&run, &[]);
    }

    #[test]
    fn cut_and_splice_round_trip_every_range() {
        let items: Vec<u32> = (0..40).collect();
        for i in 0..items.len() {
            for j in i..=items.len() {
                let mut list = seeded(i as u64 * 100 + j as u64);
                list.extend(items.iter().cloned());
                let mut run = list.cut(i..j).unwrap();
                run.check();
                list.check();
                assert_eq!(run.len(), j - i);
                list.splice(i, &mut run).unwrap();
                check(&list, &items);
            }
        }
    }

    #[test]
    fn merge_sort_is_idempotent() {
        let mut list = IndexedList::from_slice(&[5, 1, 4, 2, 3]);
        list.sort();
        check(&list, &[1, 2, 3, 4, 5]);
        list.sort();
        check(&list, &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn merge_sort_large_and_stable() {
        let mut rng = SmallRng::seed_from_u64(10);
        let items: Vec<(u32, usize)> = (0..2500).map(|i| (rng.gen_range(0, 50), i)).collect();
        let mut list = seeded(11);
        list.extend(items.iter().cloned());

        list.sort_by(|a, b| a.0.cmp(&b.0));
        let mut expected = items.clone();
        expected.sort_by_key(|item| item.0);
        check(&list, &expected);

        list.sort_by_key(|item| std::cmp::Reverse(item.1));
        let mut expected = items;
        expected.reverse();
        check(&list, &expected);
    }

    #[test]
    fn quick_and_insertion_sort() {
        let mut rng = SmallRng::seed_from_u64(12);
        let items: Vec<i64> = (0..1000).map(|_| rng.gen_range(-500, 500)).collect();
        let mut expected = items.clone();
        expected.sort();

        let mut list = seeded(13);
        list.extend(items.iter().cloned());
        list.quick_sort_by(|a, b| a.cmp(b));
        check(&list, &expected);

        let mut list = seeded(14);
        list.extend(items[..150].iter().cloned());
        list.insertion_sort_by(|a, b| b.cmp(a));
        let mut short = items[..150].to_vec();
        short.sort_by(|a, b| b.cmp(a));
        check(&list, &short);
    }

    #[test]
    fn quick_sort_equal_keys() {
        let mut list = seeded(15);
        list.extend(std::iter::repeat(7u32).take(5000));
        list.quick_sort_by(|a, b| a.cmp(b));
        check(&list, &vec![7; 5000]);

        // Only the key is compared, so the tags may move but none go missing.
        let mut list = seeded(16);
        list.extend((0..4000u32).map(|i| (i % 3, i)));
        list.quick_sort_by(|a, b| a.0.cmp(&b.0));
        list.check();
        let keys: Vec<u32> = list.iter().map(|p| p.0).collect();
        let mut expected_keys = keys.clone();
        expected_keys.sort();
        assert_eq!(keys, expected_keys);
        let mut tags: Vec<u32> = list.iter().map(|p| p.1).collect();
        tags.sort();
        assert_eq!(tags, (0..4000).collect::<Vec<_>>());
    }

    #[test]
    fn quick_sort_presorted() {
        let ascending: Vec<u32> = (0..1000).collect();
        let descending: Vec<u32> = (0..1000).rev().collect();

        let mut list = seeded(17);
        list.extend(ascending.iter().cloned());
        list.quick_sort_by(|a, b| a.cmp(b));
        check(&list, &ascending);

        let mut list = seeded(18);
        list.extend(descending.iter().cloned());
        list.quick_sort_by(|a, b| a.cmp(b));
        check(&list, &ascending);

        list.quick_sort_by(|a, b| b.cmp(a));
        check(&list, &descending);
    }

    #[test]
    fn resize_drops_the_tail() {
        let mut list = seeded(19);
        list.extend(0..500u32);
        list.resize(10, 0);
        check(&list, &(0..10).collect::<Vec<_>>());

        list.resize(12, 99);
        check(&list, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 99, 99]);
        list.resize(0, 0);
        check(&list, &[]);
    }

    #[test]
    fn sort_part_of_a_list() {
        let mut list = IndexedList::from_slice(&[9, 8, 7, 3, 2, 1, 0]);
        list.merge_sort_range(1..6, |a, b| a.cmp(b)).unwrap();
        check(&list, &[9, 1, 2, 3, 7, 8, 0]);
        assert!(list.merge_sort_range(3..9, |a, b| a.cmp(b)).is_err());
    }

    #[test]
    fn merge_two_sorted_lists() {
        let mut a = IndexedList::from_slice(&[(1, 'a'), (3, 'a'), (5, 'a')]);
        let mut b = IndexedList::from_slice(&[(1, 'b'), (2, 'b'), (5, 'b'), (6, 'b')]);
        a.merge_by(&mut b, |x, y| x.0.cmp(&y.0)).unwrap();
        check(&a, &[(1, 'a'), (1, 'b'), (2, 'b'), (3, 'a'), (5, 'a'), (5, 'b'), (6, 'b')]);
        check(&b, &[]);
    }

    #[test]
    fn insert_then_erase_restores_size() {
        let mut set: SkipSet<u32> = (0..50).map(|i| i * 2).collect();
        let before = set.len();
        let (pos, inserted) = set.insert(31);
        assert!(inserted);
        assert_eq!(pos.index(), 16);
        set.erase(&pos).unwrap();
        assert_eq!(set.len(), before);
        assert!(set.find(&31).is_none());
        set.check();

        assert_eq!(set.remove(&30), Some(30));
        assert_eq!(set.remove(&30), None);
        assert_eq!(set.len(), before - 1);
    }

    #[test]
    fn bounds_and_counts() {
        let set: MultiSkipSet<u32> = vec![1, 2, 2, 2, 3, 5].into_iter().collect();
        set.check();
        assert_eq!(set.lower_bound(&2).index(), 1);
        assert_eq!(set.upper_bound(&2).index(), 4);
        assert_eq!(set.count(&2), 3);
        assert_eq!(set.count(&4), 0);
        assert_eq!(set.lower_bound(&4).index(), 5);
        assert_eq!(set.upper_bound(&9), set.end());
        assert_eq!(set.find(&2), Some(set.position_at(1).unwrap()));

        let (first, last) = set.equal_range(&2);
        assert_eq!(set.range(first.index()..last.index()).unwrap().cloned().collect::<Vec<_>>(), vec![2, 2, 2]);
    }

    #[test]
    fn multimap_keeps_insertion_order_among_equal_keys() {
        let mut map = MultiSkipMap::new();
        map.insert((2, 'a'));
        map.insert((1, 'b'));
        map.insert((2, 'c'));
        map.insert((2, 'd'));
        map.check();
        assert_eq!(map.values().cloned().collect::<Vec<_>>(), vec!['b', 'a', 'c', 'd']);
        assert_eq!(map.get_value(&2), Some(&'a'));

        assert_eq!(map.remove_all(&2), 3);
        assert_eq!(map.len(), 1);
        map.check();
    }

    #[test]
    fn sorted_erase_ranges_and_pops() {
        let mut set: SkipSet<u32> = (0..20).collect();
        assert_eq!(set.erase_range(5..15), Ok(10));
        assert_eq!(set.iter().cloned().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 15, 16, 17, 18, 19]);
        assert_eq!(set.pop_first(), Some(0));
        assert_eq!(set.pop_last(), Some(19));
        set.retain(|&v| v % 2 == 1);
        assert_eq!(set.iter().cloned().collect::<Vec<_>>(), vec![1, 3, 15, 17]);
        set.check();

        let (item, next) = set.erase(&set.find(&3).unwrap()).unwrap();
        assert_eq!(item, 3);
        assert_eq!(set.at_position(&next), Some(&15));
        assert_eq!(next.index(), 1);
    }

    #[test]
    fn refresh_after_inserts() {
        let mut list = IndexedList::from_slice(&[10, 20, 30]);
        let mut pos = list.position_at(1).unwrap();
        assert_eq!(list.get(&pos), Some(&20));

        list.push_front(5);
        assert_eq!(pos.index(), 1);
        assert_eq!(list.refresh(&mut pos), Some(2));
        assert_eq!(pos.index(), 2);

        list.push_back(40);
        assert_eq!(list.refresh(&mut pos), Some(2));

        list.erase(&pos).unwrap();
        assert_eq!(list.refresh(&mut pos), None);
        assert_eq!(list.get(&pos), None);
        assert_eq!(list.erase(&pos), Err(Error::StalePosition));
    }

    #[test]
    fn refresh_in_a_sorted_list() {
        let mut set: SkipSet<u32> = vec![10, 20, 30].into_iter().collect();
        let mut pos = set.find(&20).unwrap();
        set.insert(5);
        assert_eq!(set.refresh(&mut pos), Some(2));
        set.insert(25);
        assert_eq!(set.refresh(&mut pos), Some(2));
        assert_eq!(set.index_of(&pos), Ok(2));
    }

    #[test]
    fn position_arithmetic() {
        let list: IndexedList<u32> = (0..100).collect();
        let begin = list.begin();
        let mid = list.offset(&begin, 50).unwrap();
        assert_eq!(list.get(&mid), Some(&50));
        assert_eq!(mid.index(), 50);

        let back = list.offset(&mid, -10).unwrap();
        assert_eq!(list.get(&back), Some(&40));

        let last = list.offset(&list.end(), -1).unwrap();
        assert_eq!(list.get(&last), Some(&99));
        assert_eq!(list.offset(&last, 1).unwrap(), list.end());

        assert_eq!(list.offset(&mid, 51), Err(Error::OutOfRange { index: 101, len: 100 }));
        assert_eq!(list.offset(&mid, -51), Err(Error::OutOfRange { index: std::usize::MAX, len: 100 }));

        let next = list.next_position(&mid).unwrap();
        assert_eq!(list.get(&next), Some(&51));
        let prev = list.prev_position(&mid).unwrap();
        assert_eq!(list.get(&prev), Some(&49));
        assert!(list.prev_position(&begin).is_err());
        assert!(list.next_position(&list.end()).is_err());

        assert_eq!(list.cmp_positions(&prev, &next), Ok(Ordering::Less));
        for i in 0..=100 {
            let pos = list.offset(&begin, i as isize).unwrap();
            assert_eq!(pos, list.position_at(i).unwrap());
            assert_eq!(list.index_of(&pos), Ok(i));
        }
    }

    #[test]
    fn compare_positions_in_a_run_of_equal_keys() {
        let set: MultiSkipSet<u32> = vec![1, 2, 2, 2, 3].into_iter().collect();
        let p1 = set.position_at(1).unwrap();
        let p3 = set.position_at(3).unwrap();
        assert_eq!(set.cmp_positions(&p1, &p3), Ok(Ordering::Less));
        assert_eq!(set.cmp_positions(&p3, &p1), Ok(Ordering::Greater));
        assert_eq!(set.cmp_positions(&p3, &p3), Ok(Ordering::Equal));
        assert_eq!(set.cmp_positions(&set.begin(), &p1), Ok(Ordering::Less));
        assert_eq!(set.cmp_positions(&set.end(), &p1), Ok(Ordering::Greater));
    }

    #[test]
    fn positions_from_another_list() {
        let mut a = IndexedList::from_slice(&[1, 2, 3]);
        let b = IndexedList::from_slice(&[1, 2, 3]);
        let pa = a.position_at(0).unwrap();
        let pb = b.position_at(2).unwrap();
        assert_eq!(a.iter_swap(&pa, &pb), Err(Error::ForeignPosition));
        assert_eq!(a.get(&pb), None);
        check(&a, &[1, 2, 3]);

        let pa2 = a.position_at(2).unwrap();
        a.iter_swap(&pa, &pa2).unwrap();
        check(&a, &[3, 2, 1]);
        // Positions follow their items.
        assert_eq!(a.get(&pa), Some(&1));
        assert_eq!(a.index_of(&pa), Ok(2));

        // Clones are different containers.
        let c = a.clone();
        assert_eq!(c.get(&pa), None);
    }

    #[test]
    fn incompatible_levels_are_refused() {
        // A zero rng promotes every node to the max level.
        let mut tall = IndexedList::with_rng(Options::new(0.5, 4), StepRng::new(0, 0));
        tall.extend(0..10);
        assert_eq!(tall.level(), 4);
        let mut flat = IndexedList::with_options(Options::new(0.5, 0));
        flat.extend(100..103);

        assert_eq!(tall.cut_into(2..4, &mut flat), Err(Error::IncompatibleLevel { level: 4, max_level: 0 }));
        assert_eq!(flat.splice(0, &mut tall), Err(Error::IncompatibleLevel { level: 4, max_level: 0 }));
        check(&tall, &(0..10).collect::<Vec<_>>());
        check(&flat, &[100, 101, 102]);

        // The other direction always fits.
        tall.splice(10, &mut flat).unwrap();
        check(&tall, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 100, 101, 102]);
        check(&flat, &[]);
    }

    #[test]
    fn cut_into_replaces_target() {
        let mut a = seeded(3);
        a.extend(0..10);
        let mut b = seeded(4);
        b.extend(50..55);
        a.cut_into(3..6, &mut b).unwrap();
        check(&a, &[0, 1, 2, 6, 7, 8, 9]);
        check(&b, &[3, 4, 5]);
        assert_eq!(a.cut_into(5..9, &mut b).err(), Some(Error::OutOfRange { index: 9, len: 7 }));
    }

    #[test]
    fn moves_and_swaps() {
        let mut list: IndexedList<u32> = (0..8).collect();
        list.move_range(6, 1..3).unwrap();
        check(&list, &[0, 3, 4, 5, 1, 2, 6, 7]);
        list.move_range(0, 6..8).unwrap();
        check(&list, &[6, 7, 0, 3, 4, 5, 1, 2]);
        list.move_range(3, 2..4).unwrap();
        check(&list, &[6, 7, 0, 3, 4, 5, 1, 2]);
        list.move_to(8, 0).unwrap();
        check(&list, &[7, 0, 3, 4, 5, 1, 2, 6]);

        list.swap(0, 7).unwrap();
        check(&list, &[6, 0, 3, 4, 5, 1, 2, 7]);
        list.swap(2, 3).unwrap();
        check(&list, &[6, 0, 4, 3, 5, 1, 2, 7]);
        assert!(list.swap(2, 8).is_err());

        list.swap_ranges(0..2, 5..8).unwrap();
        check(&list, &[1, 2, 7, 4, 3, 5, 6, 0]);
        list.swap_ranges(3..5, 0..3).unwrap();
        check(&list, &[4, 3, 1, 2, 7, 5, 6, 0]);
        assert!(list.swap_ranges(0..3, 2..4).is_err());

        list.reverse();
        check(&list, &[0, 6, 5, 7, 2, 1, 3, 4]);
        list.reverse_range(2..5).unwrap();
        check(&list, &[0, 6, 2, 7, 5, 1, 3, 4]);
    }

    #[test]
    fn unique_and_retain() {
        let mut list = IndexedList::from_slice(&[1, 1, 2, 3, 3, 3, 1, 4, 4]);
        assert_eq!(list.unique(), 4);
        check(&list, &[1, 2, 3, 1, 4]);
        list.retain(|&v| v != 1);
        check(&list, &[2, 3, 4]);
        assert_eq!(list.unique_by(|a, b| b - a == 1), 1);
        check(&list, &[2, 4]);
    }

    #[test]
    fn level_shrinks_when_emptied() {
        let mut list = IndexedList::with_rng(Options::new(0.5, 5), StepRng::new(0, 0));
        list.extend(0..4);
        assert_eq!(list.level(), 5);
        while list.pop_back().is_some() {
            list.check();
        }
        assert_eq!(list.level(), 0);

        let mut set: SkipSet<u32> = (0..500).collect();
        for i in 0..500 {
            set.remove(&i);
        }
        assert_eq!(set.level(), 0);
        set.check();
    }

    #[test]
    fn flat_lists_still_work() {
        let mut list = IndexedList::with_options(Options::new(0.5, 0));
        list.extend((0..50).rev());
        list.sort();
        check(&list, &(0..50).collect::<Vec<_>>());
    }

    fn random_range<R: Rng>(rng: &mut R, len: usize) -> (usize, usize) {
        let a = rng.gen_range(0, len + 1);
        let b = rng.gen_range(0, len + 1);
        (min(a, b), a.max(b))
    }

    #[test]
    fn random_edits() {
        let mut list = seeded::<u32>(20);
        let mut model: Vec<u32> = Vec::new();
        let mut rng = SmallRng::seed_from_u64(21);
        let mut next = 0;

        for _ in 0..1500 {
            check(&list, &model);
            let len = model.len();

            match rng.gen_range(0, 8) {
                _ if len == 0 => {
                    list.push_back(next);
                    model.push(next);
                    next += 1;
                }
                0 | 1 | 2 if len < 200 => {
                    let pos = rng.gen_range(0, len + 1);
                    list.insert(pos, next).unwrap();
                    model.insert(pos, next);
                    next += 1;
                }
                0 | 1 | 2 | 3 => {
                    let pos = rng.gen_range(0, len);
                    assert_eq!(list.erase_index(pos), Ok(model.remove(pos)));
                }
                4 => {
                    let (start, end) = random_range(&mut rng, len);
                    let dest = rng.gen_range(0, len + 1);
                    list.move_range(dest, start..end).unwrap();
                    if dest < start || dest > end {
                        let run: Vec<u32> = model.drain(start..end).collect();
                        let at = if dest > end { dest - run.len() } else { dest };
                        for (i, v) in run.into_iter().enumerate() {
                            model.insert(at + i, v);
                        }
                    }
                }
                5 => {
                    let (i, j) = (rng.gen_range(0, len), rng.gen_range(0, len));
                    list.swap(i, j).unwrap();
                    model.swap(i, j);
                }
                6 => {
                    let (start, end) = random_range(&mut rng, len);
                    list.reverse_range(start..end).unwrap();
                    model[start..end].reverse();
                }
                _ => {
                    let (start, end) = random_range(&mut rng, len);
                    let mut run = list.cut(start..end).unwrap();
                    let cut: Vec<u32> = model.drain(start..end).collect();
                    check(&run, &cut);
                    check(&list, &model);

                    let at = rng.gen_range(0, model.len() + 1);
                    list.splice(at, &mut run).unwrap();
                    for (i, v) in cut.into_iter().enumerate() {
                        model.insert(at + i, v);
                    }
                }
            }
        }
    }

    #[test]
    fn random_sorted_edits() {
        let mut set: MultiSkipSet<u32, SmallRng> =
            SortedList::with_rng(Options::with_probability(0.5), SmallRng::seed_from_u64(30));
        let mut model: Vec<u32> = Vec::new();
        let mut rng = SmallRng::seed_from_u64(31);

        for _ in 0..2000 {
            let value = rng.gen_range(0, 100);
            if model.is_empty() || rng.gen::<f32>() < 0.6 {
                let (pos, inserted) = set.insert(value);
                assert!(inserted);
                let at = model.iter().position(|&v| v > value).unwrap_or(model.len());
                model.insert(at, value);
                assert_eq!(pos.index(), at);
            } else {
                let removed = set.remove(&value);
                match model.iter().position(|&v| v == value) {
                    Some(at) => { model.remove(at); assert_eq!(removed, Some(value)); }
                    None => assert_eq!(removed, None),
                }
            }
        }

        set.check();
        assert_eq!(set.iter().cloned().collect::<Vec<_>>(), model);
        for (i, v) in model.iter().enumerate() {
            assert_eq!(set.at(i), Ok(v));
            let pos = set.position_at(i).unwrap();
            assert_eq!(set.index_of(&pos), Ok(i));
        }
        for v in 0..100 {
            assert_eq!(set.count(&v), model.iter().filter(|&&m| m == v).count());
        }
    }

    #[test]
    fn drops_every_item_once() {
        use testdrop::TestDrop;

        let td = TestDrop::new();
        let mut ids = Vec::new();
        let mut list = IndexedList::new();
        for _ in 0..10 {
            let (id, item) = td.new_item();
            ids.push(id);
            list.push_back(item);
        }

        let removed = list.erase_index(3).unwrap();
        td.assert_no_drop(ids[3]);
        drop(removed);
        td.assert_drop(ids[3]);

        list.erase_range(0..2).unwrap();
        td.assert_drop(ids[0]);
        td.assert_drop(ids[1]);

        let run = list.cut(4..7).unwrap();
        drop(list);
        assert_eq!(td.num_dropped_items(), 10 - run.len());
        drop(run);
        assert_eq!(td.num_dropped_items(), 10);
    }

    #[test]
    fn sorted_containers_drop_refused_and_cleared_items() {
        use testdrop::TestDrop;

        let td = TestDrop::new();
        let mut map = SkipMap::new();
        let (first, item) = td.new_item();
        map.insert((1, item));
        let (second, item) = td.new_item();
        let (_, inserted) = map.insert((1, item));
        assert!(!inserted);
        td.assert_drop(second);
        td.assert_no_drop(first);

        for k in 2..6 {
            let (_, item) = td.new_item();
            map.insert((k, item));
        }
        map.clear();
        assert_eq!(td.num_dropped_items(), 6);
        assert!(map.is_empty());
    }

    #[test]
    fn into_iter_drops_the_rest() {
        use testdrop::TestDrop;

        let td = TestDrop::new();
        let mut list = IndexedList::new();
        for _ in 0..5 {
            let (_, item) = td.new_item();
            list.push_back(item);
        }
        let mut iter = list.into_iter();
        let first = iter.next();
        let last = iter.next_back();
        assert!(first.is_some() && last.is_some());
        assert_eq!(iter.len(), 3);
        drop(iter);
        assert_eq!(td.num_dropped_items(), 3);
        drop((first, last));
        assert_eq!(td.num_dropped_items(), 5);
    }
}
