use im::Vector;

pub trait PushImmut<T> {
    fn push(&self, item: T) -> Vector<T>;
}

impl<T: Clone> PushImmut<T> for Vector<T> {
    fn push(&self, item: T) -> Vector<T> {
        let mut result = self.clone();
        result.push_back(item);
        result
    }
}
