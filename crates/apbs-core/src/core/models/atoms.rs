/// One atom of a molecule description: position in Angstroms, charge in elementary
/// charge units, radius in Angstroms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atom {
    pub position: [f64; 3],
    pub charge: f64,
    pub radius: f64,
}

/// Atoms laid out as parallel coordinate/charge/radius arrays, the shape the solver
/// library's atom loader consumes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomList {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    pub charge: Vec<f64>,
    pub radius: Vec<f64>,
}

impl AtomList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, atom: Atom) {
        self.x.push(atom.position[0]);
        self.y.push(atom.position[1]);
        self.z.push(atom.position[2]);
        self.charge.push(atom.charge);
        self.radius.push(atom.radius);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Atom> {
        if index >= self.len() {
            return None;
        }
        Some(Atom {
            position: [self.x[index], self.y[index], self.z[index]],
            charge: self.charge[index],
            radius: self.radius[index],
        })
    }
}

impl FromIterator<Atom> for AtomList {
    fn from_iter<I: IntoIterator<Item = Atom>>(iter: I) -> Self {
        let mut list = AtomList::new();
        for atom in iter {
            list.push(atom);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_arrays_parallel() {
        let list: AtomList = [
            Atom {
                position: [1.0, 2.0, 3.0],
                charge: -1.0,
                radius: 1.5,
            },
            Atom {
                position: [4.0, 5.0, 6.0],
                charge: 0.5,
                radius: 2.0,
            },
        ]
        .into_iter()
        .collect();

        assert_eq!(list.len(), 2);
        assert_eq!(list.y, vec![2.0, 5.0]);
        assert_eq!(list.charge, vec![-1.0, 0.5]);
        assert_eq!(list.get(1).unwrap().radius, 2.0);
        assert!(list.get(2).is_none());
    }
}
